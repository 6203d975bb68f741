use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::contacts::phone::{min_match, normalize_number, numbers_match};
use crate::contacts::source::{
    ContactDataSource, LookupKeyRow, NameData, NameRow, PhoneLookup, PhoneRow,
};
use crate::error::{ContactsError, ContactsResult};
use crate::models::{Mimetype, OrganizationName, StructuredName};

/// Empty strings are stored as NULL.
fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Helper to convert mimetype parse errors to rusqlite errors
fn parse_mimetype(idx: usize, s: String) -> rusqlite::Result<Mimetype> {
    Mimetype::parse(&s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(ContactsError::UnknownMimetype(s)),
        )
    })
}

impl Database {
    // ==================== CONTACT CREATE ====================

    /// Insert an aggregated contact. Without an explicit lookup key one is
    /// derived from the new row id.
    pub fn insert_contact(&self, lookup_key: Option<&str>) -> ContactsResult<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO contacts (lookup_key) VALUES (?)", [lookup_key])?;
        let id = conn.last_insert_rowid();

        if lookup_key.is_none() {
            conn.execute(
                "UPDATE contacts SET lookup_key = ? WHERE id = ?",
                params![format!("local.{}", id), id],
            )?;
        }
        Ok(id)
    }

    pub fn find_contact_by_lookup_key(&self, lookup_key: &str) -> ContactsResult<Option<i64>> {
        let id: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT id FROM contacts WHERE lookup_key = ?",
                [lookup_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Find the contact for `lookup_key`, creating it when missing.
    pub fn get_or_create_contact(&self, lookup_key: &str) -> ContactsResult<i64> {
        match self.find_contact_by_lookup_key(lookup_key)? {
            Some(id) => Ok(id),
            None => self.insert_contact(Some(lookup_key)),
        }
    }

    pub fn set_contact_photo(
        &self,
        contact_id: i64,
        photo_uri: &str,
        thumbnail_uri: &str,
    ) -> ContactsResult<()> {
        self.conn()?.execute(
            "UPDATE contacts SET photo_uri = ?, photo_thumbnail_uri = ? WHERE id = ?",
            params![non_empty(photo_uri), non_empty(thumbnail_uri), contact_id],
        )?;
        Ok(())
    }

    pub fn insert_raw_contact(&self, contact_id: i64, account_name: Option<&str>) -> ContactsResult<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO raw_contacts (contact_id, account_name) VALUES (?, ?)",
            params![contact_id, account_name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_structured_name(&self, raw_id: i64, name: &StructuredName) -> ContactsResult<i64> {
        let id = {
            let conn = self.conn()?;
            conn.execute(
                r#"INSERT INTO data (
                    raw_contact_id, mimetype, prefix, given_name, middle_name, family_name, suffix
                ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    raw_id,
                    Mimetype::StructuredName.as_str(),
                    non_empty(&name.prefix),
                    non_empty(&name.given),
                    non_empty(&name.middle),
                    non_empty(&name.family),
                    non_empty(&name.suffix),
                ],
            )?;
            conn.last_insert_rowid()
        };

        if let Some(display) = name.display_name() {
            self.fill_display_name(raw_id, &display)?;
        }
        Ok(id)
    }

    pub fn insert_organization(&self, raw_id: i64, org: &OrganizationName) -> ContactsResult<i64> {
        let id = {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO data (raw_contact_id, mimetype, company, title) VALUES (?, ?, ?, ?)",
                params![
                    raw_id,
                    Mimetype::Organization.as_str(),
                    non_empty(&org.company),
                    non_empty(&org.title),
                ],
            )?;
            conn.last_insert_rowid()
        };

        if let Some(display) = org.display_name() {
            self.fill_display_name(raw_id, &display)?;
        }
        Ok(id)
    }

    /// Insert a phone row, storing the normalized number and its min-match key.
    pub fn insert_phone(&self, raw_id: i64, number: &str) -> ContactsResult<i64> {
        let normalized = normalize_number(number, &self.country_code);
        let key = min_match(number);

        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO data (
                raw_contact_id, mimetype, number, normalized_number, min_match
            ) VALUES (?, ?, ?, ?, ?)"#,
            params![
                raw_id,
                Mimetype::Phone.as_str(),
                number,
                normalized,
                non_empty(&key),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The first named row of a contact becomes its display name.
    fn fill_display_name(&self, raw_id: i64, display: &str) -> ContactsResult<()> {
        self.conn()?.execute(
            r#"UPDATE contacts SET display_name = ?
               WHERE display_name IS NULL
               AND id = (SELECT contact_id FROM raw_contacts WHERE id = ?)"#,
            params![display, raw_id],
        )?;
        Ok(())
    }

    // ==================== CONTACT READ ====================

    pub fn count_contacts(&self) -> ContactsResult<u32> {
        let count: u32 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn query_name_rows(&self) -> ContactsResult<Vec<NameRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT d.raw_contact_id, r.contact_id, d.mimetype,
                      d.prefix, d.given_name, d.middle_name, d.family_name, d.suffix,
                      d.company, d.title, c.photo_thumbnail_uri
               FROM data d
               INNER JOIN raw_contacts r ON r.id = d.raw_contact_id
               INNER JOIN contacts c ON c.id = r.contact_id
               WHERE d.mimetype = ? OR d.mimetype = ?
               ORDER BY d.raw_contact_id ASC, d.id ASC"#,
        )?;

        let rows = stmt
            .query_map(
                [Mimetype::StructuredName.as_str(), Mimetype::Organization.as_str()],
                Self::row_to_name_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn query_phone_rows(&self) -> ContactsResult<Vec<PhoneRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT d.raw_contact_id, r.contact_id, d.normalized_number
               FROM data d
               INNER JOIN raw_contacts r ON r.id = d.raw_contact_id
               WHERE d.mimetype = ?
               ORDER BY d.raw_contact_id ASC, d.id ASC"#,
        )?;

        let rows = stmt
            .query_map([Mimetype::Phone.as_str()], |row| {
                Ok(PhoneRow {
                    raw_id: row.get(0)?,
                    contact_id: row.get(1)?,
                    normalized_number: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Reverse lookup: candidates share the min-match key, the first one whose
    /// number matches wins.
    pub fn find_by_phone_number(&self, number: &str) -> ContactsResult<Option<PhoneLookup>> {
        let key = min_match(number);
        if key.is_empty() {
            return Ok(None);
        }

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT c.display_name, c.photo_uri, d.number, d.normalized_number
               FROM data d
               INNER JOIN raw_contacts r ON r.id = d.raw_contact_id
               INNER JOIN contacts c ON c.id = r.contact_id
               WHERE d.mimetype = ? AND d.min_match = ?
               ORDER BY c.id ASC, d.id ASC"#,
        )?;

        let mut rows = stmt.query(params![Mimetype::Phone.as_str(), key])?;
        while let Some(row) = rows.next()? {
            let stored: Option<String> = row.get(2)?;
            let normalized: Option<String> = row.get(3)?;
            let matches = [stored, normalized]
                .iter()
                .flatten()
                .any(|candidate| numbers_match(candidate, number));

            if matches {
                return Ok(Some(PhoneLookup {
                    display_name: row.get(0)?,
                    photo_uri: row.get(1)?,
                }));
            }
        }

        Ok(None)
    }

    pub fn find_lookup_key(&self, raw_id: i64) -> ContactsResult<Option<LookupKeyRow>> {
        let row = self
            .conn()?
            .query_row(
                r#"SELECT r.contact_id, c.lookup_key
                   FROM data d
                   INNER JOIN raw_contacts r ON r.id = d.raw_contact_id
                   INNER JOIN contacts c ON c.id = r.contact_id
                   WHERE d.mimetype = ? AND d.raw_contact_id = ?
                   ORDER BY d.id ASC
                   LIMIT 1"#,
                params![Mimetype::StructuredName.as_str(), raw_id],
                |row| {
                    Ok(LookupKeyRow {
                        contact_id: row.get(0)?,
                        lookup_key: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn row_to_name_row(row: &Row) -> rusqlite::Result<NameRow> {
        let text = |idx: usize| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        };

        let data = match parse_mimetype(2, row.get(2)?)? {
            Mimetype::Organization => NameData::Organization(OrganizationName {
                company: text(8)?,
                title: text(9)?,
            }),
            _ => NameData::Structured(StructuredName {
                prefix: text(3)?,
                given: text(4)?,
                middle: text(5)?,
                family: text(6)?,
                suffix: text(7)?,
            }),
        };

        Ok(NameRow {
            raw_id: row.get(0)?,
            contact_id: row.get(1)?,
            photo_thumbnail_uri: row.get(10)?,
            data,
        })
    }
}

impl ContactDataSource for Database {
    fn name_rows(&self) -> ContactsResult<Vec<NameRow>> {
        self.query_name_rows()
    }

    fn phone_rows(&self) -> ContactsResult<Vec<PhoneRow>> {
        self.query_phone_rows()
    }

    fn phone_lookup(&self, number: &str) -> ContactsResult<Option<PhoneLookup>> {
        self.find_by_phone_number(number)
    }

    fn lookup_key(&self, raw_id: i64) -> ContactsResult<Option<LookupKeyRow>> {
        self.find_lookup_key(raw_id)
    }
}
