//! Normalisation of user-supplied entry titles and project names

use crate::constants::{DEFAULT_ENTRY_TITLE, MAX_PROJECT_NAME_LENGTH, MAX_TITLE_LENGTH};
use crate::{Result, TallyError};

/// Trim an entry title, substituting the default title when blank.
///
/// # Errors
///
/// Returns [`TallyError::InvalidInput`] when the trimmed title is longer than
/// [`MAX_TITLE_LENGTH`] characters.
///
/// ```
/// use tally_domain::utils::title::normalize_title;
///
/// assert_eq!(normalize_title("  Deep work ").unwrap(), "Deep work");
/// assert_eq!(normalize_title("").unwrap(), "New Entry");
/// ```
pub fn normalize_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_ENTRY_TITLE.to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TallyError::InvalidInput(format!(
            "title exceeds {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a project name. Unlike titles, names have no default.
///
/// # Errors
///
/// Returns [`TallyError::InvalidInput`] for blank names and names longer than
/// [`MAX_PROJECT_NAME_LENGTH`] characters.
pub fn normalize_project_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TallyError::InvalidInput("project name is required".into()));
    }
    if trimmed.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(TallyError::InvalidInput(format!(
            "project name exceeds {MAX_PROJECT_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}
