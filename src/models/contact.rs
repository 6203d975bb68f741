use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of trailing phone-number characters two contacts must share to be
/// considered the same entry.
pub const DEDUP_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Contact {
    pub raw_id: i64,
    pub contact_id: i64,
    pub name: String,
    pub photo_uri: String,
    pub phone_number: String,
}

impl Contact {
    pub fn new(
        raw_id: i64,
        contact_id: i64,
        name: String,
        photo_uri: String,
        phone_number: String,
    ) -> Self {
        Self {
            raw_id,
            contact_id,
            name,
            photo_uri,
            phone_number,
        }
    }

    /// Record coming from the name query: no phone number yet.
    pub fn named(raw_id: i64, contact_id: i64, name: String, photo_uri: String) -> Self {
        Self::new(raw_id, contact_id, name, photo_uri, String::new())
    }

    /// Record coming from the phone query: no name or photo yet.
    pub fn with_number(raw_id: i64, contact_id: i64, phone_number: String) -> Self {
        Self::new(raw_id, contact_id, String::new(), String::new(), phone_number)
    }

    /// Trailing `DEDUP_SUFFIX_LEN` characters of the phone number, or the whole
    /// number when it is shorter.
    pub fn dedup_key(&self) -> &str {
        let count = self.phone_number.chars().count();
        let skip = count.saturating_sub(DEDUP_SUFFIX_LEN);
        match self.phone_number.char_indices().nth(skip) {
            Some((start, _)) => &self.phone_number[start..],
            None => "",
        }
    }
}

impl Ord for Contact {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.phone_number.cmp(&other.phone_number))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.raw_id.cmp(&other.raw_id))
            .then_with(|| self.contact_id.cmp(&other.contact_id))
            .then_with(|| self.photo_uri.cmp(&other.photo_uri))
    }
}

impl PartialOrd for Contact {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
