//! Serialization helpers for domain data types

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serializer};

/// Serde adapter storing a [`TimeDelta`] as signed milliseconds
///
/// ```rust
/// use chrono::TimeDelta;
/// use serde::{Deserialize, Serialize};
/// use tally_domain::utils::serde::duration_millis;
///
/// #[derive(Serialize, Deserialize)]
/// struct Example {
///     #[serde(with = "duration_millis")]
///     paused: TimeDelta,
/// }
/// ```
pub mod duration_millis {
    use serde::de::Error as _;

    use super::{Deserialize, Deserializer, Serializer, TimeDelta};

    /// Serde serialization result type
    type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

    /// Serialize a duration as whole milliseconds
    pub fn serialize<S>(duration: &TimeDelta, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    /// Deserialize whole milliseconds into a duration
    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        TimeDelta::try_milliseconds(millis)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {millis}ms")))
    }
}

/// Serde adapter storing a [`TimeDelta`] as whole seconds
pub mod duration_seconds {
    use serde::de::Error as _;

    use super::{Deserialize, Deserializer, Serializer, TimeDelta};

    /// Serialize a duration as whole seconds
    pub fn serialize<S>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    /// Deserialize whole seconds into a duration
    pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(seconds)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {seconds}s")))
    }
}
