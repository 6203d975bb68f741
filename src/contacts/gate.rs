use std::sync::Arc;

use crate::db::Database;
use crate::error::ContactsError;

/// Answers whether reading contacts is currently allowed.
pub trait PermissionGate: Send + Sync {
    fn has_read_contacts_permission(&self) -> bool;
}

/// Receives lookup failures for user-visible reporting.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &ContactsError);
}

/// Permission gate backed by the `permission.read_contacts` setting.
pub struct SettingsPermissionGate {
    db: Arc<Database>,
}

impl SettingsPermissionGate {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl PermissionGate for SettingsPermissionGate {
    fn has_read_contacts_permission(&self) -> bool {
        match self.db.read_contacts_permission() {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(error = %e, "could not read permission setting, treating as denied");
                false
            }
        }
    }
}

/// Prints lookup failures to stderr.
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&self, error: &ContactsError) {
        tracing::debug!(error = %error, "contact lookup failed");
        eprintln!("Error: {}", error);
    }
}
