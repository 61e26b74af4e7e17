//! Integration tests for mercury-rs
//!
//! Every test talks real HTTP to a local mock backend.

pub mod archive_tests;
