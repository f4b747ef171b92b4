//! Request Validation Module
//!
//! Per-field sanitization and validation rules composed into a record
//! validator. Validation is total: it yields a fully-populated
//! [`ValidatedUser`] or a classified rejection, never a record with some
//! fields trusted and others not.
//!
//! Tag stripping here is defense in depth. It does not replace contextual
//! output encoding, which remains the renderer's responsibility.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::error::AppError;

/// Validation error types
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("invalid name")]
    InvalidName,

    #[error("invalid role: {value}")]
    InvalidRole { value: String },

    #[error("no valid permissions")]
    NoValidPermissions,

    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    #[error("field '{field}' is too long (max: {max}, got: {got})")]
    TooLong {
        field: String,
        max: usize,
        got: usize,
    },

    #[error("payload must be a JSON object")]
    NotAnObject,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::ValidationRejected(e.to_string())
    }
}

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Maximum accepted length for a user-supplied name
pub const MAX_NAME_LENGTH: usize = 255;

/// User role enumeration; anything outside this set is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user
    User,
    /// Administrator
    Admin,
    /// Content moderator
    Moderator,
}

impl Role {
    /// Parse a role string against the fixed set.
    pub fn parse(value: &str) -> ValidationResult<Self> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            other => Err(ValidationError::InvalidRole {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::Moderator => write!(f, "moderator"),
        }
    }
}

/// Grantable permission enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read access
    Read,
    /// Write access
    Write,
    /// Delete access
    Delete,
}

impl Permission {
    /// Parse a single permission string; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "delete" => Some(Permission::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Read => write!(f, "read"),
            Permission::Write => write!(f, "write"),
            Permission::Delete => write!(f, "delete"),
        }
    }
}

/// Raw, untrusted user-creation input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserInput {
    /// Display name (untrusted)
    pub name: String,
    /// Requested role (untrusted)
    pub role: String,
    /// Requested permissions (untrusted)
    pub permissions: Vec<String>,
}

/// A user record that passed every field rule.
///
/// Fields are private; the validator is the only constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedUser {
    name: String,
    role: Role,
    permissions: BTreeSet<Permission>,
}

impl ValidatedUser {
    /// Run the full rule table over raw input.
    ///
    /// Rules, in order:
    /// - `name`: markup-like tags stripped, control characters removed,
    ///   trimmed; must remain non-empty and within length bounds
    /// - `role`: must be one of the fixed role set
    /// - `permissions`: filtered against the fixed permission set; the
    ///   filtered set must be non-empty
    pub fn validate(input: &UserInput) -> ValidationResult<Self> {
        let name = sanitize_name(&input.name)?;
        let role = Role::parse(&input.role)?;

        let permissions: BTreeSet<Permission> = input
            .permissions
            .iter()
            .filter_map(|p| Permission::parse(p))
            .collect();

        if permissions.is_empty() {
            return Err(ValidationError::NoValidPermissions);
        }

        Ok(Self {
            name,
            role,
            permissions,
        })
    }

    /// Sanitized display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Validated, non-empty permission set
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Project the record back into raw input form.
    ///
    /// Re-validating this input yields an identical record; the validator
    /// is a pure function of its input.
    pub fn to_input(&self) -> UserInput {
        UserInput {
            name: self.name.clone(),
            role: self.role.to_string(),
            permissions: self.permissions.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Sanitize a user-supplied name: strip markup-like tags, drop control
/// characters, trim whitespace. An empty or oversized result is rejected.
pub fn sanitize_name(input: &str) -> ValidationResult<String> {
    let tag_pattern = regex::Regex::new(r"<[^>]*>").unwrap();
    let stripped = tag_pattern.replace_all(input, "");

    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() {
        return Err(ValidationError::InvalidName);
    }

    if cleaned.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            got: cleaned.chars().count(),
        });
    }

    Ok(cleaned)
}

/// Require a parsed JSON payload to be an object.
///
/// The `/data` route accepts arbitrary object payloads but nothing else;
/// scalars, arrays and null are rejected before any processing.
pub fn ensure_json_object(value: &serde_json::Value) -> ValidationResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ValidationError::NotAnObject)
    }
}

/// Validate field length
pub fn validate_length(
    field: &str,
    value: &str,
    max: usize,
) -> ValidationResult<()> {
    let length = value.chars().count();

    if length == 0 {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }

    if length > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            got: length,
        });
    }

    Ok(())
}
