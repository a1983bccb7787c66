//! Domain models and types for dbkeeper.
//!
//! The domain layer provides:
//! - **Targets** ([`Target`], [`TargetKind`]) as delivered by the control plane
//! - **Backup records** ([`Backup`]) describing one exported sub-unit
//! - **Error types** ([`BackupError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use dbkeeper::domain::{Target, TargetKind};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let target = Target::builder()
//!     .name("shop")
//!     .kind(TargetKind::Mongo)
//!     .address("mongo-0.internal")
//!     .port(27017)
//!     .username("backup")
//!     .password("secret")
//!     .database("shop")
//!     .build()?;
//!
//! assert_eq!(target.redacted().password, "6");
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod errors;
pub mod result;
pub mod target;

pub use backup::Backup;
pub use errors::{ApiError, BackupError};
pub use result::Result;
pub use target::{Endpoint, RedactedTarget, Target, TargetBuilder, TargetKind};
