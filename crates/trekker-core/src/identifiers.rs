//! Validated identifier types shared by every Trekker crate
//!
//! Identifiers follow the parse-don't-validate pattern: they can only be
//! obtained through `parse()` (or a `const` constructor for compile-time
//! labels), so holding one means the value already passed validation.
//!
//! ```rust
//! use trekker_core::identifiers::{IssueKey, ExecutionId};
//!
//! let key = IssueKey::parse("ABC-1").unwrap();
//! assert_eq!(key.project(), "ABC");
//! assert!(IssueKey::parse("../etc").is_err());
//!
//! let a = ExecutionId::generate();
//! let b = ExecutionId::generate();
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::validation::{IdentifierRules, ValidationError};

/// Key of an issue in the application under test, e.g. `ABC-1`
///
/// Keys are safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueKey(String);

impl IssueKey {
    /// Parse and validate an issue key
    pub fn parse(key: impl AsRef<str>) -> Result<Self, ValidationError> {
        IdentifierRules::ISSUE_KEY.validate(key.as_ref()).map(Self)
    }

    /// Get the issue key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project part of the key: everything before the last `-`
    ///
    /// Keys without a dash are their own project.
    pub fn project(&self) -> &str {
        match self.0.rsplit_once('-') {
            Some((project, _)) if !project.is_empty() => project,
            _ => &self.0,
        }
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IssueKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IssueKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<IssueKey> for String {
    fn from(key: IssueKey) -> Self {
        key.0
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique identifier of a single action execution
///
/// Used to namespace diagnostic output so that concurrent or overlapping
/// executions never write into the same directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(uuid::Uuid);

impl ExecutionId {
    /// Generate a fresh random execution identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: uuid::Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Label of an action kind, used to tag observations and metrics
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct ActionKey(Cow<'static, str>);

impl ActionKey {
    /// Create a key from a static label without validation
    ///
    /// Intended for the built-in `const` labels.
    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    /// Parse and validate a custom action label
    pub fn parse(label: impl AsRef<str>) -> Result<Self, ValidationError> {
        IdentifierRules::ACTION_KEY
            .validate(label.as_ref())
            .map(|s| Self(Cow::Owned(s)))
    }

    /// Get the label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ActionKey> for String {
    fn from(key: ActionKey) -> Self {
        key.0.into_owned()
    }
}
