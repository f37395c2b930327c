//! Shared fixtures and checks for the lock tests.

pub mod search_test_helpers;
