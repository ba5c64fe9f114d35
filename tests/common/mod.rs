//! Shared utilities for integration tests.

pub mod harness;
