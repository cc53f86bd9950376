//! Shared test utilities for the lockstep workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for a temporary tracked project

pub mod project;

pub use project::TestProject;
