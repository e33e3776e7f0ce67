//! The contact entity, its identifiers, validation rules and error taxonomy.
mod error;
mod id;
mod types;
mod validation;

pub use error::{ContactError, Field, Rejection, StorageError};
pub use id::{IdGenerator, IdStrategy, ObjectId};
pub use types::{sample_contacts, Contact, ContactId, ContactInput, ContactPatch, ContactsFile};
pub use validation::{
    find_by_name, validate, validate_fields, DuplicatePolicy, ValidFields, Validated,
    PHONE_NUMBER_REGEX,
};
