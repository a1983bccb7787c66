//! Result type alias for dbkeeper

use super::errors::BackupError;

/// Result type alias for dbkeeper operations
///
/// # Examples
///
/// ```
/// use dbkeeper::domain::result::Result;
/// use dbkeeper::domain::errors::BackupError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BackupError::Other("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BackupError>;
