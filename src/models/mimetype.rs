/// Kind of a data row in the contact store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mimetype {
    StructuredName,
    Organization,
    Phone,
}

impl Mimetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredName => "vnd.android.cursor.item/name",
            Self::Organization => "vnd.android.cursor.item/organization",
            Self::Phone => "vnd.android.cursor.item/phone_v2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vnd.android.cursor.item/name" => Some(Self::StructuredName),
            "vnd.android.cursor.item/organization" => Some(Self::Organization),
            "vnd.android.cursor.item/phone_v2" => Some(Self::Phone),
            _ => None,
        }
    }
}
