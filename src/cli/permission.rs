use anyhow::{bail, Result};

use super::ContactsApp;

/// Execute the permission command
pub fn run_permission(app: &ContactsApp, action: &str) -> Result<()> {
    match action.to_lowercase().as_str() {
        "grant" => {
            app.db.set_read_contacts_permission(true)?;
            println!("Contact read permission granted.");
        }
        "revoke" | "deny" => {
            app.db.set_read_contacts_permission(false)?;
            println!("Contact read permission revoked.");
        }
        "status" => {
            let status = if app.db.read_contacts_permission()? {
                "granted"
            } else {
                "denied"
            };
            println!("Contact read permission: {}", status);
        }
        other => bail!("Unknown permission action: {}. Available: grant, revoke, status", other),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn revoke_makes_lookups_fall_back() {
        let db = Database::open_memory().unwrap();
        let contact_id = db.insert_contact(None).unwrap();
        let raw_id = db.insert_raw_contact(contact_id, None).unwrap();
        db.insert_structured_name(raw_id, &crate::models::StructuredName::new("", "Ann", "", "", ""))
            .unwrap();
        db.insert_phone(raw_id, "5551234567").unwrap();
        let app = ContactsApp::new(db);

        assert_eq!(app.helper.name_from_phone_number("5551234567"), "Ann");

        run_permission(&app, "revoke").unwrap();
        assert_eq!(app.helper.name_from_phone_number("5551234567"), "5551234567");

        run_permission(&app, "grant").unwrap();
        assert_eq!(app.helper.name_from_phone_number("5551234567"), "Ann");
    }

    #[test]
    fn unknown_action_fails() {
        let app = ContactsApp::new(Database::open_memory().unwrap());
        let err = run_permission(&app, "toggle").unwrap_err();
        assert!(err.to_string().contains("toggle"));
    }
}
