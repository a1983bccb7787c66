//! Engine abstraction layer
//!
//! Trait-based abstraction over database engines, the registry that selects
//! an adapter per target kind, and the external tool capability adapters use
//! to produce artifacts.

pub mod registry;
pub mod tool;
pub mod traits;

pub use registry::AdapterRegistry;
pub use tool::{ExportTool, ProcessTool, ToolInvocation};
pub use traits::{EngineAdapter, TargetSession};
