//! Serde helpers for PATCH bodies, where an absent field and an explicit
//! `null` mean different things. Use with `#[serde(default, deserialize_with = ..)]`.

use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// Absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn nullable<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// Same as [`nullable`] for RFC 3339 timestamps.
pub fn nullable_rfc3339<'de, D>(d: D) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    time::serde::rfc3339::option::deserialize(d).map(Some)
}
