//! Integration tests for stowage-lib.

mod common;
mod resources_tests;
