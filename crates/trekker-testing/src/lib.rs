//! # Trekker Testing
//!
//! Test doubles for Trekker journeys. [`MockDriver`] stands in for the
//! application under test: it serves scripted issue and search pages, can be
//! told to fail navigation, readiness or screenshots, and records every call.
//!
//! ## Usage
//!
//! ```rust
//! use trekker_core::{Issue, IssueKey};
//! use trekker_testing::MockDriver;
//!
//! let driver = MockDriver::new()
//!     .with_issue(Issue {
//!         key: IssueKey::parse("ABC-1").unwrap(),
//!         editable: true,
//!         id: 10042,
//!         issue_type: "Bug".to_string(),
//!     })
//!     .with_capture_failure("no display attached");
//!
//! assert_eq!(driver.call_count(), 0);
//! ```

/// Scripted driver and pages
pub mod mock_driver;

pub use mock_driver::{MockDriver, MockIssuePage, MockSearchResultsPage, SCREENSHOT_BYTES};
