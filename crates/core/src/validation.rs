//! Input validation shared by the request DTOs and the service layer.
//!
//! Length and range rules are declared on the DTOs with `validator`
//! attributes; rules `validator` cannot express are plain functions here.

use std::collections::HashSet;

use validator::Validate;

use crate::error::CoreError;
use crate::types::ObjectId;

pub const SLUG_MIN_LEN: u64 = 2;
pub const SLUG_MAX_LEN: u64 = 100;

/// Run the derived `validator` rules, mapping failures into the domain error.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), CoreError> {
    request
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}

/// Slugs are lowercase ASCII letters, digits and hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    let len = slug.chars().count() as u64;
    if !(SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "slug must be {SLUG_MIN_LEN}-{SLUG_MAX_LEN} characters"
        )));
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(CoreError::Validation(
            "slug may only contain a-z, 0-9 and '-'".into(),
        ));
    }
    Ok(())
}

/// Reject text that is empty once whitespace is stripped.
pub fn ensure_not_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{field} must not be blank")))
    } else {
        Ok(())
    }
}

/// A merge job must name at least one post, each at most once.
pub fn ensure_unique_ids(field: &str, ids: &[ObjectId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if id.is_empty() {
            return Err(CoreError::Validation(format!("{field} contains an empty id")));
        }
        if !seen.insert(id.as_str()) {
            return Err(CoreError::Validation(format!(
                "{field} contains duplicate id {id}"
            )));
        }
    }
    Ok(())
}
