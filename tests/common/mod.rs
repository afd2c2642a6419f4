//! Common test utilities and helpers
//!
//! Shared by the integration suites: a scripted git service and project tree builders.

#![allow(dead_code)]

pub mod mock_services;
pub mod test_fixtures;
