//! Data Transfer Objects for the write side of the API
//!
//! These are the payloads sent on create and update. They differ from the
//! decoded [`crate::domain::pipeline::Pipeline`]: server-computed fields are
//! absent, the provider descriptor is never sent and `provider_settings` only
//! exists here.

pub mod pipeline;
