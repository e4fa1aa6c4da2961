//! Common serde helpers for patch-style payloads

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Combined with `#[serde(default)]`: a missing key stays `None`, an
/// explicit `null` becomes `Some(None)` (clear the field), and a value
/// becomes `Some(Some(v))`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
