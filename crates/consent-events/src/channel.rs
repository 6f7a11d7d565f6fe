//! The closed set of notification channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Any grant change.
    Update,
    /// A grant was set to `true`.
    Grant,
    /// A grant was set to `false`.
    Revoke,
}

impl Channel {
    /// Every channel, in dispatch order for a single change.
    pub const ALL: [Channel; 3] = [Channel::Update, Channel::Grant, Channel::Revoke];

    /// The channel that follows `update` for a change to `granted`.
    pub fn for_grant(granted: bool) -> Self {
        if granted {
            Channel::Grant
        } else {
            Channel::Revoke
        }
    }

    /// Channel name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Update => "update",
            Channel::Grant => "grant",
            Channel::Revoke => "revoke",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Channel::Update => 0,
            Channel::Grant => 1,
            Channel::Revoke => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a name outside the channel set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Channel::Update),
            "grant" => Ok(Channel::Grant),
            "revoke" => Ok(Channel::Revoke),
            other => Err(UnknownChannel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>(), Ok(channel));
        }
        assert_eq!(
            "changed".parse::<Channel>(),
            Err(UnknownChannel("changed".into()))
        );
    }

    #[test]
    fn test_for_grant() {
        assert_eq!(Channel::for_grant(true), Channel::Grant);
        assert_eq!(Channel::for_grant(false), Channel::Revoke);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Channel::Revoke).unwrap(), r#""revoke""#);
    }
}
