//! Serde helpers for floats that may be non-finite
//!
//! JSON has no infinity or NaN. These helpers write them as the strings `"inf"`,
//! `"-inf"` and `"NaN"`, and read back either a number or one of those strings.
//! Use with `#[serde(with = "...")]`.

use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

fn from_repr<E: de::Error>(repr: Repr) -> Result<f64, E> {
    match repr {
        Repr::Number(value) => Ok(value),
        Repr::Text(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            other => Err(E::invalid_value(
                de::Unexpected::Str(other),
                &"a number, \"inf\", \"-inf\" or \"NaN\"",
            )),
        },
    }
}

/// Serializes a float, non-finite values as strings
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match non_finite_text(*value) {
        Some(text) => serializer.serialize_str(text),
        None => serializer.serialize_f64(*value),
    }
}

/// Deserializes a number or a non-finite string
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    from_repr(Repr::deserialize(deserializer)?)
}

/// The same for `Option<f64>`; `None` stays `null`
pub mod option {
    use super::{from_repr, non_finite_text, Repr};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes an optional float
    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => match non_finite_text(*v) {
                Some(text) => serializer.serialize_some(text),
                None => serializer.serialize_some(v),
            },
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional float
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<Repr>::deserialize(deserializer)?
            .map(from_repr)
            .transpose()
    }
}
