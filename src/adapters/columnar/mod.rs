//! Wide-column (Cassandra/Scylla) support
//!
//! Tables come from the driver's schema metadata. Each table is exported with
//! `cqlsh`, trying the target's hosts in order.

pub mod adapter;
pub mod exporter;
pub mod failover;

pub use adapter::{ColumnarAdapter, ColumnarSession};
pub use exporter::ColumnarExporter;
pub use failover::{run_with_failover, FailoverError, HostAttempt};
