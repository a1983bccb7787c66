//! Document store (MongoDB) support
//!
//! Collections are enumerated through the driver and exported one by one with
//! `mongoexport` against the first configured host.

pub mod adapter;
pub mod exporter;

pub use adapter::{MongoAdapter, MongoSession};
pub use exporter::MongoExporter;
