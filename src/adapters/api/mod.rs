//! Control plane integration
//!
//! The control plane is both the source of targets ([`TargetCatalog`]) and
//! the sink for backup records ([`Reporter`]).

pub mod client;
pub mod traits;

pub use client::ApiClient;
pub use traits::{Reporter, TargetCatalog};
