//! CLI command implementations
//!
//! Exit codes shared by all commands:
//! - `0` success
//! - `1` run finished with failures
//! - `2` configuration error
//! - `3` target catalog could not be loaded
//! - `5` fatal error
//! - `130` run interrupted

pub mod run;
pub mod targets;
pub mod validate;

pub const EXIT_OK: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_CATALOG: i32 = 3;
pub const EXIT_FATAL: i32 = 5;
pub const EXIT_INTERRUPTED: i32 = 130;
