//! md-dl library
//!
//! A read-through file cache in front of the MangaDex API, plus the pieces the
//! CLI uses to describe a series. Exposed as a library for integration tests.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod details;
pub mod render;
