pub mod gate;
pub mod helper;
pub mod phone;
pub mod source;

pub use gate::{ErrorReporter, PermissionGate, SettingsPermissionGate, StderrReporter};
pub use helper::{merge_contacts, ContactsHelper};
pub use source::{ContactDataSource, LookupKeyRow, NameData, NameRow, PhoneLookup, PhoneRow};
