//! Writers for certified metadata documents and their STAC companions.
pub mod metadata;
pub mod stac;

pub use metadata::{to_checked_document, to_document, write_document};
pub use stac::{StacItem, to_stac_item, to_stac_json, write_stac_item};
