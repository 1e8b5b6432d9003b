use ac_02_identity_gate::IdentityConfig;
use serde::{Deserialize, Serialize};

use crate::repository::RecordCodec;

/// Academy records service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Encoding of records in the store.
    pub codec: RecordCodec,
    /// Organisation ids and attribute trusted by the gate.
    pub identity: IdentityConfig,
}
