use serde::{Deserialize, Serialize};

use crate::error::{TendencyError, TendencyResult};
use crate::interaction::{BusEvent, BusPayload, EventKind};

pub const BUS_EVENT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusEventJsonContractV1 {
    pub schema_version: u32,
    pub event: EventKind,
    pub payload: BusPayload,
}

impl BusEvent {
    pub fn to_json_contract_v1(&self) -> TendencyResult<String> {
        serde_json::to_string(&self.contract_v1()).map_err(|e| {
            TendencyError::InvalidData(format!("failed to serialize bus event contract v1: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> TendencyResult<String> {
        serde_json::to_string_pretty(&self.contract_v1()).map_err(|e| {
            TendencyError::InvalidData(format!("failed to serialize bus event contract v1: {e}"))
        })
    }

    /// Accepts a v1 envelope. Envelopes with another schema version are rejected.
    pub fn from_json_contract_str(input: &str) -> TendencyResult<Self> {
        let envelope: BusEventJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TendencyError::InvalidData(format!("failed to parse bus event json payload: {e}"))
        })?;
        if envelope.schema_version != BUS_EVENT_JSON_SCHEMA_V1 {
            return Err(TendencyError::InvalidData(format!(
                "unsupported bus event schema version: {}",
                envelope.schema_version
            )));
        }
        Ok(Self::new(envelope.event, envelope.payload))
    }

    fn contract_v1(&self) -> BusEventJsonContractV1 {
        BusEventJsonContractV1 {
            schema_version: BUS_EVENT_JSON_SCHEMA_V1,
            event: self.kind,
            payload: self.payload.clone(),
        }
    }
}
