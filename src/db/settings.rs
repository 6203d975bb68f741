use rusqlite::OptionalExtension;

use super::Database;
use crate::error::ContactsResult;

pub const SETTING_READ_CONTACTS: &str = "permission.read_contacts";

const GRANTED: &str = "granted";
const DENIED: &str = "denied";

impl Database {
    pub fn get_setting(&self, key: &str) -> ContactsResult<Option<String>> {
        let value: Option<String> = self
            .conn()?
            .query_row("SELECT value FROM app_settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> ContactsResult<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?, ?)",
            [key, value],
        )?;
        Ok(())
    }

    /// Unset or unrecognised values count as granted.
    pub fn read_contacts_permission(&self) -> ContactsResult<bool> {
        Ok(self.get_setting(SETTING_READ_CONTACTS)?.as_deref() != Some(DENIED))
    }

    pub fn set_read_contacts_permission(&self, granted: bool) -> ContactsResult<()> {
        self.set_setting(SETTING_READ_CONTACTS, if granted { GRANTED } else { DENIED })
    }
}
