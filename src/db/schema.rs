pub const SCHEMA_VERSION: i32 = 1;

/// Aggregated contacts own raw contacts; raw contacts own typed data rows.
/// `data.mimetype` decides which of the columns are meaningful.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    display_name TEXT,
    photo_uri TEXT,
    photo_thumbnail_uri TEXT,
    lookup_key TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS raw_contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER NOT NULL,
    account_name TEXT,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    raw_contact_id INTEGER NOT NULL,
    mimetype TEXT NOT NULL,
    prefix TEXT,
    given_name TEXT,
    middle_name TEXT,
    family_name TEXT,
    suffix TEXT,
    company TEXT,
    title TEXT,
    number TEXT,
    normalized_number TEXT,
    min_match TEXT,
    FOREIGN KEY (raw_contact_id) REFERENCES raw_contacts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_raw_contact_contact ON raw_contacts(contact_id);
CREATE INDEX IF NOT EXISTS idx_data_raw_contact ON data(raw_contact_id);
CREATE INDEX IF NOT EXISTS idx_data_mimetype ON data(mimetype);
CREATE INDEX IF NOT EXISTS idx_data_min_match ON data(min_match);

CREATE TABLE IF NOT EXISTS app_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
