use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::ContactsApp;
use crate::io_ext::WriteLn;
use crate::models::Contact;

const NAME_WIDTH: usize = 32;

/// Execute the list command
pub fn run_list(app: &ContactsApp, json: bool) -> Result<()> {
    let contacts = load_contacts(app)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    println!("Contacts ({} total)\n", contacts.len());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_ln(&format!("{:<width$}  PHONE", "NAME", width = NAME_WIDTH))?;
    for contact in &contacts {
        out.write_ln(&format_row(contact))?;
    }
    out.flush()?;
    Ok(())
}

/// Execute the export command: one `name<TAB>number<TAB>photo` line per contact
pub fn run_export(app: &ContactsApp, file: &str) -> Result<()> {
    let contacts = load_contacts(app)?;

    let path = Path::new(file);
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", file))?,
    );
    write_contacts(&mut writer, &contacts)?;
    writer.flush()?;

    println!("Exported {} contacts to {}", contacts.len(), file);
    Ok(())
}

pub fn write_contacts<W: Write>(writer: &mut W, contacts: &[Contact]) -> io::Result<()> {
    for contact in contacts {
        writer.write_ln(&format!(
            "{}\t{}\t{}",
            contact.name, contact.phone_number, contact.photo_uri
        ))?;
    }
    Ok(())
}

fn load_contacts(app: &ContactsApp) -> Result<Vec<Contact>> {
    let receiver = app.helper.available_contacts()?;
    let contacts = receiver
        .blocking_recv()
        .context("Contacts worker stopped before finishing")??;
    Ok(contacts)
}

fn format_row(contact: &Contact) -> String {
    format!(
        "{:<width$}  {}",
        truncate(&contact.name, NAME_WIDTH),
        contact.phone_number,
        width = NAME_WIDTH
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_and_truncated() {
        let short = Contact::new(1, 1, "Ann".into(), String::new(), "+15551234567".into());
        assert_eq!(format_row(&short), format!("{:<32}  +15551234567", "Ann"));

        let long_name = "A".repeat(40);
        let long = Contact::new(1, 1, long_name, String::new(), "1".into());
        assert!(format_row(&long).starts_with(&format!("{}...", "A".repeat(29))));
    }

    #[test]
    fn export_lines() {
        let contacts = vec![
            Contact::new(1, 1, "Ann".into(), "content://photo/1".into(), "+15551234567".into()),
            Contact::new(2, 2, "Ben".into(), String::new(), "+15550000000".into()),
        ];
        let mut out = Vec::new();
        write_contacts(&mut out, &contacts).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Ann\t+15551234567\tcontent://photo/1\nBen\t+15550000000\t\n"
        );
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = crate::db::Database::open_at(dir.path().join("contacts.db")).unwrap();
        let contact_id = db.insert_contact(None).unwrap();
        let raw_id = db.insert_raw_contact(contact_id, None).unwrap();
        db.insert_structured_name(raw_id, &crate::models::StructuredName::new("", "Ann", "", "", ""))
            .unwrap();
        db.insert_phone(raw_id, "5551234567").unwrap();

        let app = ContactsApp::new(db);
        let file = dir.path().join("out.tsv");
        run_export(&app, file.to_str().unwrap()).unwrap();

        let written = std::fs::read_to_string(&file).unwrap();
        assert_eq!(written, "Ann\t+15551234567\t\n");
    }
}
