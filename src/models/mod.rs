mod contact;
mod mimetype;
mod name;

pub use contact::{Contact, DEDUP_SUFFIX_LEN};
pub use mimetype::Mimetype;
pub use name::{OrganizationName, StructuredName};
