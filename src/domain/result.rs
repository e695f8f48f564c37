//! Result type alias for journal-search

use super::errors::SearchError;

/// Result type alias using `SearchError` as the error type.
///
/// # Examples
///
/// ```
/// use journal_search::domain::result::Result;
/// use journal_search::domain::errors::SearchError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SearchError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SearchError>;
