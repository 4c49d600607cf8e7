//! Variable submission validation.

use crate::error::ElicitError;

/// Validate a submitted variable list: at least two names, none empty or
/// whitespace-only, and no exact (case-sensitive) duplicates.
///
/// Input order is preserved by the caller; it determines enumeration order.
pub fn validate_variables(names: &[String]) -> Result<(), ElicitError> {
    if names.len() < 2 {
        return Err(ElicitError::InsufficientVariables(names.len()));
    }

    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ElicitError::EmptyVariableName);
        }
        if names[..i].contains(name) {
            return Err(ElicitError::DuplicateVariable(name.clone()));
        }
    }

    Ok(())
}
