//! Kite Core
//!
//! Wire types for the Buildkite pipeline API.
//!
//! This crate contains:
//! - Domain types: the pipeline resource as the API returns it (Pipeline, Step, RepositoryProvider)
//! - DTOs: write-side payloads sent on create and update

pub mod domain;
pub mod dto;
