//! serde format for service intervals. an infinite interval (no service) is
//! written as null and null is read back as infinite.
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(interval: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if interval.is_finite() {
        serializer.serialize_some(interval)
    } else {
        serializer.serialize_none()
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let interval: Option<f64> = Option::deserialize(deserializer)?;
    Ok(interval.unwrap_or(f64::INFINITY))
}
