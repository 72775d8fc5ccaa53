//! I/O layer: fact files in, metadata documents out.
//! Provides `facts` loading (JSON), the document `reader` used to re-parse
//! emitted documents, and `writers` for XML and STAC serialization and
//! atomic output.
pub mod facts;
pub use facts::load_facts;

pub mod reader;
pub use reader::parse_document;

pub mod writers;
