//! Integration test entry point.
//!
//! These tests run against a live server and the demo venue from
//! scripts/seed.sql. They are ignored by default; see api_tests.rs.

mod api_tests;
