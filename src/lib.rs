//! Unified console: a terminal front end for the unified backend.
//!
//! Four panels (database query, reference scripts, prompt tester,
//! Python runner) proxy to a small HTTP API and render its replies.

pub mod backend;
pub mod config;
pub mod shell;
pub mod tui;
