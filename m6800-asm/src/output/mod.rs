//! Object, listing, and symbol output writers.

pub mod binary;
pub mod ihex;
pub mod listing;
pub mod symbols;

pub use binary::{image_bytes, packed_bytes, write_image};
pub use ihex::{to_ihex, write_ihex};
pub use listing::{generate_listing, write_listing};
pub use symbols::write_json;
