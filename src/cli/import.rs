use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::db::Database;
use crate::error::ContactsResult;
use crate::models::{OrganizationName, StructuredName};

/// Separator between several numbers in the `phones` column.
const PHONE_SEPARATOR: char = ';';

/// A row from a CSV import file.
///
/// Every row becomes one raw contact. Rows sharing a `contact_key` are
/// attached to the same aggregated contact.
/// Empty strings are converted to `None` for optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRow {
    /// Groups raw contacts into one aggregated contact
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub contact_key: Option<String>,

    /// Source account of the raw contact
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub account: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub prefix: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub given: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub middle: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub family: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub suffix: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub company: Option<String>,

    /// Job title
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub title: Option<String>,

    /// One or more numbers separated by `;`
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phones: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub photo_uri: Option<String>,
}

impl ImportRow {
    /// A row must carry at least a name part, an organization or a phone.
    pub fn validate(&self) -> Result<()> {
        let has_any = [
            &self.prefix,
            &self.given,
            &self.middle,
            &self.family,
            &self.suffix,
            &self.company,
            &self.title,
        ]
        .iter()
        .any(|f| f.is_some())
            || !self.phone_numbers().is_empty();

        if !has_any {
            bail!("row needs a name, company, title or phone");
        }
        Ok(())
    }

    pub fn structured_name(&self) -> Option<StructuredName> {
        if self.prefix.is_none()
            && self.given.is_none()
            && self.middle.is_none()
            && self.family.is_none()
            && self.suffix.is_none()
        {
            return None;
        }
        Some(StructuredName::new(
            self.prefix.as_deref().unwrap_or(""),
            self.given.as_deref().unwrap_or(""),
            self.middle.as_deref().unwrap_or(""),
            self.family.as_deref().unwrap_or(""),
            self.suffix.as_deref().unwrap_or(""),
        ))
    }

    pub fn organization(&self) -> Option<OrganizationName> {
        if self.company.is_none() && self.title.is_none() {
            return None;
        }
        Some(OrganizationName::new(
            self.company.as_deref().unwrap_or(""),
            self.title.as_deref().unwrap_or(""),
        ))
    }

    pub fn phone_numbers(&self) -> Vec<&str> {
        self.phones
            .as_deref()
            .map(|p| {
                p.split(PHONE_SEPARATOR)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Deserialize empty strings as None.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Import results summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub contacts: u32,
    pub raw_contacts: u32,
    pub merged: u32,
    pub phones: u32,
    pub errors: u32,
}

/// Execute the import command.
pub fn run_import(db: &Database, file: &str, dry_run: bool) -> Result<()> {
    let path = Path::new(file);
    if !path.exists() {
        bail!("File not found: {}", file);
    }

    let reader = File::open(path).context("Failed to open CSV file")?;

    if dry_run {
        eprintln!("Dry run: {}", file);
    } else {
        eprintln!("Importing: {}", file);
    }

    let stats = import_csv(db, reader, dry_run)?;
    print_summary(&stats, dry_run);
    Ok(())
}

/// Import every row of `reader`. Bad rows are counted and skipped.
pub fn import_csv<R: Read>(db: &Database, reader: R, dry_run: bool) -> Result<ImportStats> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stats = ImportStats::default();
    let mut seen_keys = HashSet::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let line = idx + 2; // CSV line number (1-indexed, skip header)

        let row: ImportRow = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Line {}: parse error: {}", line, e);
                stats.errors += 1;
                continue;
            }
        };

        if let Err(e) = row.validate() {
            eprintln!("Line {}: validation error: {}", line, e);
            stats.errors += 1;
            continue;
        }

        match process_row(db, &row, &mut seen_keys, dry_run) {
            Ok(result) => {
                if result.merged {
                    stats.merged += 1;
                } else {
                    stats.contacts += 1;
                }
                stats.raw_contacts += 1;
                stats.phones += result.phones;
            }
            Err(e) => {
                eprintln!("Line {}: {}", line, e);
                stats.errors += 1;
            }
        }
    }

    tracing::info!(
        contacts = stats.contacts,
        raw_contacts = stats.raw_contacts,
        errors = stats.errors,
        dry_run,
        "csv import finished"
    );
    Ok(stats)
}

fn print_summary(stats: &ImportStats, dry_run: bool) {
    let verb = if dry_run { "Would create" } else { "Created" };

    println!(
        "\n{} {} contacts, {} raw contacts, {} phones",
        verb, stats.contacts, stats.raw_contacts, stats.phones
    );

    if stats.merged > 0 {
        println!("Merged {} rows into existing contacts", stats.merged);
    }

    if stats.errors > 0 {
        println!("Errors: {}", stats.errors);
    }
}

struct ProcessResult {
    merged: bool,
    phones: u32,
}

fn process_row(
    db: &Database,
    row: &ImportRow,
    seen_keys: &mut HashSet<String>,
    dry_run: bool,
) -> Result<ProcessResult> {
    // A key seen earlier in this file merges even on a dry run, where
    // nothing has been written to look it up by
    let merged = match row.contact_key.as_deref() {
        Some(key) => seen_keys.contains(key) || db.find_contact_by_lookup_key(key)?.is_some(),
        None => false,
    };

    let result = ProcessResult {
        merged,
        phones: row.phone_numbers().len() as u32,
    };

    if !dry_run {
        db.with_transaction(|tx| write_row(tx, row))?;
    }

    if let Some(key) = &row.contact_key {
        seen_keys.insert(key.clone());
    }

    Ok(result)
}

/// Write one row's contact, raw contact and data rows.
fn write_row(db: &Database, row: &ImportRow) -> ContactsResult<()> {
    let contact_id = match row.contact_key.as_deref() {
        Some(key) => db.get_or_create_contact(key)?,
        None => db.insert_contact(None)?,
    };
    let raw_id = db.insert_raw_contact(contact_id, row.account.as_deref())?;

    if let Some(name) = row.structured_name() {
        db.insert_structured_name(raw_id, &name)?;
    }

    if let Some(org) = row.organization() {
        db.insert_organization(raw_id, &org)?;
    }

    for number in row.phone_numbers() {
        db.insert_phone(raw_id, number)?;
    }

    if let Some(ref photo) = row.photo_uri {
        db.set_contact_photo(contact_id, photo, photo)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ContactsApp;

    const HEADER: &str = "contact_key,account,prefix,given,middle,family,suffix,company,title,phones,photo_uri";

    fn parse(data: &str) -> ImportRow {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        reader.deserialize().next().unwrap().unwrap()
    }

    #[test]
    fn parse_complete_row() {
        let row = parse(&format!(
            "{}\nk1,google,Dr,Ann,B,Lee,Jr,Acme,CTO,555-1234;+44 20 7946 0958,content://photo/1",
            HEADER
        ));

        assert_eq!(row.contact_key.as_deref(), Some("k1"));
        assert_eq!(row.account.as_deref(), Some("google"));
        assert_eq!(
            row.structured_name().unwrap().display_name().as_deref(),
            Some("Dr Ann B Lee Jr")
        );
        assert_eq!(row.organization().unwrap().display_name().as_deref(), Some("Acme CTO"));
        assert_eq!(row.phone_numbers(), vec!["555-1234", "+44 20 7946 0958"]);
        assert_eq!(row.photo_uri.as_deref(), Some("content://photo/1"));
        assert!(row.validate().is_ok());
    }

    #[test]
    fn empty_strings_become_none() {
        let row = parse(&format!("{}\n  ,,,Ann,,,,  ,,;;,", HEADER));

        assert!(row.contact_key.is_none());
        assert!(row.company.is_none());
        assert!(row.organization().is_none());
        assert!(row.phone_numbers().is_empty());
        assert!(row.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_row() {
        let row = parse(&format!("{}\nk1,google,,,,,,,,,content://photo/1", HEADER));
        let err = row.validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn headers_with_subset_of_fields() {
        let row = parse("given,phones\nAnn,5551234567");
        assert_eq!(row.given.as_deref(), Some("Ann"));
        assert_eq!(row.phone_numbers(), vec!["5551234567"]);
        assert!(row.family.is_none());
    }

    #[test]
    fn import_groups_rows_by_contact_key() {
        let db = Database::open_memory().unwrap();
        let data = format!(
            "{}\n\
             k1,google,,Ann,,Lee,,,,5551234567,content://photo/ann\n\
             k1,work,,,,,,Acme,,15551234567,\n\
             ,,,Ben,,,,,,+44 20 7946 0958,\n\
             ,,,,,,,,,,\n",
            HEADER
        );

        let stats = import_csv(&db, data.as_bytes(), false).unwrap();
        assert_eq!(
            stats,
            ImportStats {
                contacts: 2,
                raw_contacts: 3,
                merged: 1,
                phones: 3,
                errors: 1,
            }
        );
        assert_eq!(db.count_contacts().unwrap(), 2);

        let app = ContactsApp::new(db);
        let contacts = app.helper.collect_available_contacts().unwrap();
        let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ann Lee", "Ben"]);
        assert_eq!(contacts[0].photo_uri, "content://photo/ann");
        assert_eq!(app.helper.photo_uri_from_phone_number("555-123-4567"), "content://photo/ann");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let db = Database::open_memory().unwrap();
        let data = format!("{}\n,,,Ann,,,,,,5551234567,\n", HEADER);

        let stats = import_csv(&db, data.as_bytes(), true).unwrap();
        assert_eq!(stats.contacts, 1);
        assert_eq!(db.count_contacts().unwrap(), 0);
    }

    #[test]
    fn dry_run_counts_repeated_key_as_merged() {
        let data = "contact_key,given,phones\nk1,Ann,5551234567\nk1,Ann,5559999999\n";

        let dry_db = Database::open_memory().unwrap();
        let dry = import_csv(&dry_db, data.as_bytes(), true).unwrap();

        let db = Database::open_memory().unwrap();
        let real = import_csv(&db, data.as_bytes(), false).unwrap();

        assert_eq!(dry, real);
        assert_eq!(real.contacts, 1);
        assert_eq!(real.merged, 1);
        assert_eq!(real.raw_contacts, 2);
        assert_eq!(db.count_contacts().unwrap(), 1);
    }

    #[test]
    fn unparsable_row_is_counted_and_skipped() {
        let db = Database::open_memory().unwrap();
        let data = "contact_key,given,phones\nk1,Ann,5551234567,extra\nk2,Ben,5559999999\n";

        let stats = import_csv(&db, data.as_bytes(), false).unwrap();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.contacts, 1);
        assert_eq!(db.find_contact_by_lookup_key("k1").unwrap(), None);
    }

    #[test]
    fn missing_file_fails() {
        let db = Database::open_memory().unwrap();
        let err = run_import(&db, "/nonexistent/contacts.csv", false).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
