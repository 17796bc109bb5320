//! Shared unit test utilities.
//!
//! Re-exports the synthetic class-file generator shared with the e2e suite.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "../../../tests/classgen.rs"]
pub mod classgen;
