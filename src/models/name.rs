/// Structured name parts of a raw contact. Missing parts are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredName {
    pub prefix: String,
    pub given: String,
    pub middle: String,
    pub family: String,
    pub suffix: String,
}

impl StructuredName {
    pub fn new(prefix: &str, given: &str, middle: &str, family: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            given: given.to_string(),
            middle: middle.to_string(),
            family: family.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Full name joined with single spaces, or `None` when given, middle and
    /// family are all empty. Prefix and suffix alone do not make a name.
    pub fn display_name(&self) -> Option<String> {
        if self.given.is_empty() && self.middle.is_empty() && self.family.is_empty() {
            return None;
        }

        let parts: Vec<&str> = [
            self.prefix.as_str(),
            self.given.as_str(),
            self.middle.as_str(),
            self.family.as_str(),
            self.suffix.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();

        Some(parts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrganizationName {
    pub company: String,
    pub title: String,
}

impl OrganizationName {
    pub fn new(company: &str, title: &str) -> Self {
        Self {
            company: company.to_string(),
            title: title.to_string(),
        }
    }

    /// `"company title"` trimmed, or `None` when both are empty.
    pub fn display_name(&self) -> Option<String> {
        if self.company.is_empty() && self.title.is_empty() {
            return None;
        }
        Some(format!("{} {}", self.company, self.title).trim().to_string())
    }
}
