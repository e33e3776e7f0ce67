//! axum handlers for the contact API and the info pages.
mod info;
mod persons;

pub use info::{info_json, info_page};
pub use persons::{create_person, delete_person, get_person, list_persons, update_person};

use crate::directory::ContactDirectory;
use std::sync::Arc;

/// State shared by every handler.
pub type SharedDirectory = Arc<ContactDirectory>;
