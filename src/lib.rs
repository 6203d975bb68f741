pub mod cli;
pub mod config;
pub mod contacts;
pub mod db;
pub mod error;
pub mod io_ext;
pub mod logging;
pub mod models;
pub mod rename_tab;

pub use contacts::ContactsHelper;
pub use db::Database;
pub use error::{ContactsError, ContactsResult};
