//! # Juice Harness Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Artifact fixtures and the mocked terminal set
//! │
//! ├── unit/             # Per-operation suites against mocked dependencies
//! │   ├── set_fee.rs
//! │   ├── allow_migration.rs
//! │   ├── add_to_balance.rs
//! │   ├── print_tickets.rs
//! │   └── executor.rs   # Success/revert discrimination
//! │
//! └── integration/      # Workflow scenario suites
//!     ├── runner.rs     # Ordered named steps threading suite state
//!     ├── deployment.rs # Pipeline wiring and record round-trips
//!     └── workflows/    # Scenario suites carried from the protocol
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p juice-tests
//!
//! # By category
//! cargo test -p juice-tests unit::
//! cargo test -p juice-tests integration::
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
pub mod unit;
