use anyhow::Result;

use super::ContactsApp;

/// Execute the name command
pub fn run_name(app: &ContactsApp, number: &str) -> Result<()> {
    println!("{}", app.helper.name_from_phone_number(number));
    Ok(())
}

/// Execute the photo command. Prints nothing when no photo is known.
pub fn run_photo(app: &ContactsApp, number: &str) -> Result<()> {
    let uri = app.helper.photo_uri_from_phone_number(number);
    if !uri.is_empty() {
        println!("{}", uri);
    }
    Ok(())
}

/// Execute the lookup-key command
pub fn run_lookup_key(app: &ContactsApp, raw_id: i64) -> Result<()> {
    let key = app.helper.contact_lookup_key(raw_id)?;
    if key.is_empty() {
        println!("No structured name for raw contact {}", raw_id);
    } else {
        println!("{}", key);
    }
    Ok(())
}
