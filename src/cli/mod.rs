use clap::{Args, Parser, Subcommand};
use std::sync::Arc;

pub mod import;
pub mod list;
pub mod lookup;
pub mod permission;

pub use import::run_import;
pub use list::{run_export, run_list};
pub use lookup::{run_lookup_key, run_name, run_photo};
pub use permission::run_permission;

use crate::contacts::{ContactsHelper, SettingsPermissionGate, StderrReporter};
use crate::db::Database;

/// Store plus the helper wired to it with the settings-backed permission gate.
pub struct ContactsApp {
    pub db: Arc<Database>,
    pub helper: ContactsHelper<Database>,
}

impl ContactsApp {
    pub fn new(db: Database) -> Self {
        let db = Arc::new(db);
        let helper = ContactsHelper::new(
            Arc::clone(&db),
            Arc::new(SettingsPermissionGate::new(Arc::clone(&db))),
            Arc::new(StderrReporter),
        );
        Self { db, helper }
    }
}

#[derive(Parser)]
#[command(name = "simplecontacts")]
#[command(about = "Aggregate contacts and resolve phone numbers")]
#[command(version)]
pub struct Cli {
    /// Database path (overrides SIMPLECONTACTS_DB)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List named, deduplicated contacts with their phone numbers
    List(ListArgs),
    /// Resolve a phone number to a display name
    Name(NumberArgs),
    /// Resolve a phone number to a photo reference
    Photo(NumberArgs),
    /// Show the lookup key of a raw contact
    LookupKey(LookupKeyArgs),
    /// Import contacts from a CSV file
    Import(ImportArgs),
    /// Export the contact list as tab-separated lines
    Export(ExportArgs),
    /// Grant, revoke or show contact read permission
    Permission(PermissionArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Print as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args)]
pub struct NumberArgs {
    pub number: String,
}

#[derive(Args)]
pub struct LookupKeyArgs {
    pub raw_id: i64,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Path to CSV file
    pub file: String,
    #[arg(short, long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file
    pub file: String,
}

#[derive(Args)]
pub struct PermissionArgs {
    /// grant, revoke or status
    #[arg(default_value = "status")]
    pub action: String,
}
