//! Serde support, behind the `serde` feature.
//!
//! Outcomes use serde's externally tagged enum layout: `{"Ok": value}`,
//! `{"Err": error}` and `"Nil"`. The retrieval flag is not serialized; a
//! deserialized `Ok` starts unconsumed.
//!
//! [`Error`] serializes as `{"message": ..., "context": [...]}`. The cause is
//! not carried across.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::outcome::Outcome;

#[derive(Serialize)]
#[serde(rename = "Outcome")]
enum OutcomeRef<'a, T, E> {
    Ok(&'a T),
    Err(&'a E),
    Nil,
}

#[derive(Deserialize)]
#[serde(rename = "Outcome")]
enum OutcomeOwned<T, E> {
    Ok(T),
    Err(E),
    Nil,
}

impl<T: Serialize, E: Serialize> Serialize for Outcome<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Ok(held) => OutcomeRef::<T, E>::Ok(held),
            Outcome::Err(e) => OutcomeRef::Err(e),
            Outcome::Nil => OutcomeRef::Nil,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, E: Deserialize<'de>> Deserialize<'de> for Outcome<T, E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match OutcomeOwned::deserialize(deserializer)? {
            OutcomeOwned::Ok(value) => Outcome::present(value),
            OutcomeOwned::Err(e) => Outcome::Err(e),
            OutcomeOwned::Nil => Outcome::Nil,
        })
    }
}

#[derive(Serialize)]
#[serde(rename = "Error")]
struct ErrorRef<'a> {
    message: &'a str,
    context: &'a [String],
}

#[derive(Deserialize)]
#[serde(rename = "Error")]
struct ErrorOwned {
    message: String,
    #[serde(default)]
    context: Vec<String>,
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorRef {
            message: self.message(),
            context: self.context_trail(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Error {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let owned = ErrorOwned::deserialize(deserializer)?;
        Ok(owned
            .context
            .into_iter()
            .fold(Error::msg(owned.message), |err, ctx| err.context(ctx)))
    }
}
