//! Core domain types
//!
//! This module contains the pipeline resource as decoded from API responses.
//! `Step` and the provider settings types are also reused on the write side,
//! since their wire shape is identical in both directions.

pub mod pipeline;
pub mod provider;
pub mod step;

use serde::{Deserialize, Deserializer};

/// Deserialize a `null` field as the type's default value
///
/// The API returns `null` for unset maps, lists and strings.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
