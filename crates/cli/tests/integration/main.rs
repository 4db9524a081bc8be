//! CLI integration tests that source the generated script with a real shell.

mod common;
mod escape_tests;
mod reload_tests;
