//! Application services layered over the transport traits.
//!
//! Each service owns the typed decoding of its documents and logs failures
//! before handing them back to the caller.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

pub mod auth;
pub mod categories;
pub mod download;
pub mod session_file;
pub mod users;
pub mod wallpapers;

pub(crate) fn to_document<T: Serialize>(operation: &'static str, value: &T) -> ClientResult<Value> {
    serde_json::to_value(value).map_err(|source| ClientError::Decode { operation, source })
}

pub(crate) fn decode<T: DeserializeOwned>(operation: &'static str, value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|source| ClientError::Decode { operation, source })
}
