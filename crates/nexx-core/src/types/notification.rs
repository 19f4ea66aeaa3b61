//! Notification request and result types

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{Command, EntityKind};
use crate::REMOTE_STATE_OK;

/// Caller supplied values, transmitted as request headers
pub type Values = BTreeMap<String, String>;

/// Decoded JSON object returned by the manage API
pub type RawPayload = Map<String, Value>;

/// A single CRUD notification
///
/// Construction enforces the kind/command invariant, so a value of this type
/// is always dispatchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub entity_kind: EntityKind,
    pub command: Command,
    /// Remote numeric ID for videos, local entity ID otherwise
    pub reference_id: String,
    pub values: Values,
}

impl NotificationRequest {
    pub fn new(
        entity_kind: EntityKind,
        command: Command,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<Self> {
        entity_kind.ensure_supports(command)?;

        Ok(Self {
            entity_kind,
            command,
            reference_id: reference_id.into(),
            values,
        })
    }

    pub fn insert(
        entity_kind: EntityKind,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<Self> {
        Self::new(entity_kind, Command::Insert, reference_id, values)
    }

    pub fn update(
        entity_kind: EntityKind,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<Self> {
        Self::new(entity_kind, Command::Update, reference_id, values)
    }

    pub fn delete(
        entity_kind: EntityKind,
        reference_id: impl Into<String>,
        values: Values,
    ) -> Result<Self> {
        Self::new(entity_kind, Command::Delete, reference_id, values)
    }
}

/// Outcome of a dispatched notification
///
/// `success` is only true on a confirmed remote `"ok"`. On remote failure
/// `raw` still carries the decoded payload; on configuration or transport
/// failure it is empty.
#[derive(Debug)]
pub struct NotificationResult {
    pub success: bool,
    pub remote_state: Option<String>,
    pub remote_info: Option<String>,
    pub raw: RawPayload,
    pub error: Option<Error>,
}

impl NotificationResult {
    /// Classify a decoded response payload
    pub fn from_payload(raw: RawPayload) -> Self {
        let remote_state = string_field(&raw, "state");
        let remote_info = string_field(&raw, "info");

        if remote_state.as_deref() == Some(REMOTE_STATE_OK) {
            Self {
                success: true,
                remote_state,
                remote_info,
                raw,
                error: None,
            }
        } else {
            let error = Error::Remote {
                state: remote_state.clone(),
                info: remote_info.clone(),
            };
            Self {
                success: false,
                remote_state,
                remote_info,
                raw,
                error: Some(error),
            }
        }
    }

    /// A failure that never produced a remote payload
    pub fn failed(error: Error) -> Self {
        Self {
            success: false,
            remote_state: None,
            remote_info: None,
            raw: RawPayload::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The decoded payload, only on confirmed remote success
    pub fn payload(&self) -> Option<&RawPayload> {
        self.success.then_some(&self.raw)
    }

    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(Error::code)
    }
}

fn string_field(raw: &RawPayload, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
