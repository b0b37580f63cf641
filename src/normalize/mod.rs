//! Post-extraction normalization and selection policies.

pub mod contact;
pub mod images;

pub use contact::{guess_city, normalize_phones};
pub use images::{image_source, is_placeholder, select_cover};
