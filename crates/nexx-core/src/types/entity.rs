//! Entity kinds and CRUD commands
//!
//! The wire form of both enums is their lower-case name, which ends up in
//! the manage URL and in the request token.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Category of remote object being synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Actor,
    Channel,
    Tag,
    Video,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Actor,
        EntityKind::Channel,
        EntityKind::Tag,
        EntityKind::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Actor => "actor",
            EntityKind::Channel => "channel",
            EntityKind::Tag => "tag",
            EntityKind::Video => "video",
        }
    }

    /// Whether notifications for this kind may carry the given command.
    ///
    /// Video lifecycle (insert/delete) is not routed through the manage API,
    /// only updates are.
    pub fn supports(&self, command: Command) -> bool {
        !matches!(
            (self, command),
            (EntityKind::Video, Command::Insert) | (EntityKind::Video, Command::Delete)
        )
    }

    /// Reject a kind/command combination the remote API does not accept
    pub fn ensure_supports(&self, command: Command) -> Result<()> {
        if self.supports(command) {
            Ok(())
        } else {
            Err(Error::InvalidOperation {
                kind: *self,
                command,
            })
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "actor" => Ok(EntityKind::Actor),
            "channel" => Ok(EntityKind::Channel),
            "tag" => Ok(EntityKind::Tag),
            "video" => Ok(EntityKind::Video),
            other => Err(Error::InvalidArgument(format!(
                "Unknown streamtype: {}",
                other
            ))),
        }
    }
}

/// CRUD operation being notified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Insert,
    Update,
    Delete,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Insert => "insert",
            Command::Update => "update",
            Command::Delete => "delete",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "insert" => Ok(Command::Insert),
            "update" => Ok(Command::Update),
            "delete" => Ok(Command::Delete),
            other => Err(Error::InvalidArgument(format!("Unknown command: {}", other))),
        }
    }
}
