//! Required-key checks run before an input document leaves the process.

use super::{keys, DecisionInput, Section};
use crate::error::InputError;

/// Checks that `input` carries every key a policy can rely on.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. `subject.type`
/// 2. `subject.id`
/// 3. `resource.type`
/// 4. `resource.id`
/// 5. `action.name`
/// 6. `context.type`, only when `context` is present
///
/// A key holding JSON `null` counts as missing.
///
/// # Errors
///
/// Returns [`InputError::Incomplete`] naming the first missing key.
///
/// # Examples
///
/// ```
/// use opa_authz::input::{validate, DecisionInput};
///
/// let err = validate(&DecisionInput::default()).unwrap_err();
/// assert_eq!(err.to_string(), "input must contain 'subject.type'");
/// ```
pub fn validate(input: &DecisionInput) -> Result<(), InputError> {
    require(&input.subject, keys::SUBJECT, keys::SUBJECT_TYPE)?;
    require(&input.subject, keys::SUBJECT, keys::SUBJECT_ID)?;
    require(&input.resource, keys::RESOURCE, keys::RESOURCE_TYPE)?;
    require(&input.resource, keys::RESOURCE, keys::RESOURCE_ID)?;
    require(&input.action, keys::ACTION, keys::ACTION_NAME)?;
    if let Some(context) = &input.context {
        require(context, keys::CONTEXT, keys::CONTEXT_TYPE)?;
    }
    Ok(())
}

fn require(section: &Section, name: &'static str, key: &'static str) -> Result<(), InputError> {
    match section.get(key) {
        Some(value) if !value.is_null() => Ok(()),
        _ => Err(InputError::Incomplete { section: name, key }),
    }
}
