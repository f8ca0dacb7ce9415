//! Shared validation utilities for identifiers
//!
//! Issue keys end up as directory names under the diagnostics root, so the
//! rules here reject anything that could escape that directory.

/// Validation rules for string identifiers
#[derive(Debug, Clone, Copy)]
pub struct IdentifierRules {
    /// Maximum allowed length in characters
    pub max_length: usize,
    /// Whether to allow dots (.) in the identifier
    pub allow_dots: bool,
    /// Whether to allow spaces inside the identifier
    pub allow_inner_spaces: bool,
    /// Whether to check for path traversal sequences (`..`)
    pub check_path_traversal: bool,
    /// Whether to trim whitespace before validation
    pub trim_whitespace: bool,
}

impl IdentifierRules {
    /// Rules for issue keys such as `ABC-123`
    ///
    /// - Max length: 128 characters
    /// - Allows: alphanumeric, `_`, `-`, `.`
    /// - Rejects `.` and `..` so a key always names its own directory
    pub const ISSUE_KEY: Self = Self {
        max_length: 128,
        allow_dots: true,
        allow_inner_spaces: false,
        check_path_traversal: true,
        trim_whitespace: true,
    };

    /// Rules for action labels such as `View Issue`
    pub const ACTION_KEY: Self = Self {
        max_length: 64,
        allow_dots: false,
        allow_inner_spaces: true,
        check_path_traversal: false,
        trim_whitespace: false,
    };

    /// Validate a string against these rules
    ///
    /// Returns the validated string, trimmed when `trim_whitespace` is set.
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let processed = if self.trim_whitespace {
            input.trim()
        } else {
            input
        };

        if processed.is_empty() {
            return Err(ValidationError::Empty);
        }

        if !self.trim_whitespace && input != input.trim() {
            return Err(ValidationError::LeadingTrailingWhitespace);
        }

        if processed.len() > self.max_length {
            return Err(ValidationError::TooLong {
                length: processed.len(),
                max: self.max_length,
            });
        }

        // `.` alone names the current directory
        if self.check_path_traversal && (processed.contains("..") || processed == ".") {
            return Err(ValidationError::PathTraversal);
        }

        for ch in processed.chars() {
            let is_valid = ch.is_alphanumeric()
                || ch == '_'
                || ch == '-'
                || (ch == '.' && self.allow_dots)
                || (ch == ' ' && self.allow_inner_spaces);

            if !is_valid {
                return Err(ValidationError::InvalidChar {
                    char: ch,
                    input: processed.to_string(),
                });
            }
        }

        Ok(processed.to_string())
    }
}

/// Errors that can occur during identifier validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Identifier is empty
    #[error("Identifier cannot be empty")]
    Empty,
    /// Identifier has leading or trailing whitespace
    #[error("Identifier cannot have leading or trailing whitespace")]
    LeadingTrailingWhitespace,
    /// Identifier exceeds maximum allowed length
    #[error("Identifier too long: {length} characters (max {max})")]
    TooLong {
        /// Actual length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Identifier contains an invalid character
    #[error("Identifier '{input}' contains invalid character '{char}'")]
    InvalidChar {
        /// The invalid character
        char: char,
        /// The full input string
        input: String,
    },
    /// Identifier is `.` or contains path traversal sequences
    #[error("Identifier cannot be '.' or contain path traversal sequences (..)")]
    PathTraversal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_key_rules_accept_typical_keys() {
        let rules = IdentifierRules::ISSUE_KEY;
        assert_eq!(rules.validate("ABC-1").unwrap(), "ABC-1");
        assert_eq!(rules.validate("  JRA-12345 ").unwrap(), "JRA-12345");
        assert_eq!(rules.validate("proj_2.x-7").unwrap(), "proj_2.x-7");
    }

    #[test]
    fn issue_key_rules_reject_path_escapes() {
        let rules = IdentifierRules::ISSUE_KEY;
        assert_eq!(rules.validate(".."), Err(ValidationError::PathTraversal));
        assert_eq!(rules.validate("."), Err(ValidationError::PathTraversal));
        assert_eq!(rules.validate(" . "), Err(ValidationError::PathTraversal));
        assert!(matches!(
            rules.validate("ABC/1"),
            Err(ValidationError::InvalidChar { char: '/', .. })
        ));
        assert!(matches!(
            rules.validate("ABC\\1"),
            Err(ValidationError::InvalidChar { char: '\\', .. })
        ));
    }

    #[test]
    fn empty_and_oversized_inputs_are_rejected() {
        let rules = IdentifierRules::ISSUE_KEY;
        assert_eq!(rules.validate("   "), Err(ValidationError::Empty));
        let long = "A".repeat(129);
        assert_eq!(
            rules.validate(&long),
            Err(ValidationError::TooLong {
                length: 129,
                max: 128
            })
        );
    }

    #[test]
    fn dotted_keys_that_are_not_bare_dots_stay_valid() {
        let rules = IdentifierRules::ISSUE_KEY;
        assert_eq!(rules.validate(".ABC-1").unwrap(), ".ABC-1");
        assert_eq!(rules.validate("ABC.1").unwrap(), "ABC.1");
    }

    #[test]
    fn action_key_rules_allow_inner_spaces_only() {
        let rules = IdentifierRules::ACTION_KEY;
        assert!(rules.validate("View Issue").is_ok());
        assert_eq!(
            rules.validate(" View Issue"),
            Err(ValidationError::LeadingTrailingWhitespace)
        );
    }
}
