use crate::error::ContactsResult;
use crate::models::{Contact, OrganizationName, StructuredName};

/// Name-bearing payload of a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameData {
    Structured(StructuredName),
    Organization(OrganizationName),
}

/// One structured-name or organization row of a raw contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    pub raw_id: i64,
    pub contact_id: i64,
    pub photo_thumbnail_uri: Option<String>,
    pub data: NameData,
}

impl NameRow {
    /// Resolve the display name. Rows without a usable name yield `None`.
    pub fn into_contact(self) -> Option<Contact> {
        let name = match &self.data {
            NameData::Structured(n) => n.display_name()?,
            NameData::Organization(o) => o.display_name()?,
        };
        Some(Contact::named(
            self.raw_id,
            self.contact_id,
            name,
            self.photo_thumbnail_uri.unwrap_or_default(),
        ))
    }
}

/// One phone row of a raw contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRow {
    pub raw_id: i64,
    pub contact_id: i64,
    pub normalized_number: Option<String>,
}

/// Result of a reverse lookup by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneLookup {
    pub display_name: Option<String>,
    pub photo_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKeyRow {
    pub contact_id: i64,
    pub lookup_key: Option<String>,
}

/// Read access to a contact store.
///
/// Row order is part of the contract: implementations must return rows in a
/// stable order (raw contact id, then row id) so the aggregation is
/// deterministic.
pub trait ContactDataSource: Send + Sync {
    /// Structured-name and organization rows.
    fn name_rows(&self) -> ContactsResult<Vec<NameRow>>;

    fn phone_rows(&self) -> ContactsResult<Vec<PhoneRow>>;

    /// Reverse lookup of the contact owning `number`. `Ok(None)` when nothing matches.
    fn phone_lookup(&self, number: &str) -> ContactsResult<Option<PhoneLookup>>;

    /// Lookup key of the aggregated contact owning the raw contact's
    /// structured-name row.
    fn lookup_key(&self, raw_id: i64) -> ContactsResult<Option<LookupKeyRow>>;
}
