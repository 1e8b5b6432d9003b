//! Record marshalling.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::errors::AcademyError;

/// On-store encoding of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCodec {
    /// serde_json, readable by any ledger client.
    #[default]
    Json,
    /// bincode 1.x, compact.
    Bincode,
}

impl RecordCodec {
    pub fn encode<T: Serialize>(&self, record: &T) -> Result<Vec<u8>, AcademyError> {
        match self {
            RecordCodec::Json => serde_json::to_vec(record)
                .map_err(|e| AcademyError::SerializationFailure(e.to_string())),
            RecordCodec::Bincode => bincode::serialize(record)
                .map_err(|e| AcademyError::SerializationFailure(e.to_string())),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, AcademyError> {
        match self {
            RecordCodec::Json => serde_json::from_slice(bytes)
                .map_err(|e| AcademyError::SerializationFailure(e.to_string())),
            RecordCodec::Bincode => bincode::deserialize(bytes)
                .map_err(|e| AcademyError::SerializationFailure(e.to_string())),
        }
    }
}

impl FromStr for RecordCodec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(RecordCodec::Json),
            "bincode" => Ok(RecordCodec::Bincode),
            other => Err(format!("unknown record codec '{}' (expected json|bincode)", other)),
        }
    }
}
