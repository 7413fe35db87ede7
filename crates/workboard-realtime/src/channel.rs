//! Real-time channel model.
//!
//! Channel kinds are a tagged variant dispatched through the single
//! [`authorize`](crate::ChannelAuthorizer::authorize) entry point
//! rather than one handler type per kind.

use std::fmt;

use uuid::Uuid;

use crate::error::ChannelError;

/// A named real-time channel a caller can ask to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Workspace-wide events.
    Workspace(Uuid),
    /// Events scoped to a single board.
    Board(Uuid),
    /// Board-scoped presence roster; a grant publishes the
    /// subscriber's identity to the channel's other subscribers.
    BoardPresence(Uuid),
}

impl Channel {
    /// Parse a wire channel name: `workspace.<uuid>`, `board.<uuid>`,
    /// or `presence-board.<uuid>`.
    pub fn parse(name: &str) -> Result<Self, ChannelError> {
        let (kind, target) = name
            .split_once('.')
            .ok_or_else(|| ChannelError::MalformedName(name.to_string()))?;
        let target: Uuid = target
            .parse()
            .map_err(|_| ChannelError::MalformedName(name.to_string()))?;
        match kind {
            "workspace" => Ok(Self::Workspace(target)),
            "board" => Ok(Self::Board(target)),
            "presence-board" => Ok(Self::BoardPresence(target)),
            _ => Err(ChannelError::UnknownKind(name.to_string())),
        }
    }

    /// The wire name for this channel.
    pub fn name(&self) -> String {
        match self {
            Self::Workspace(id) => format!("workspace.{id}"),
            Self::Board(id) => format!("board.{id}"),
            Self::BoardPresence(id) => format!("presence-board.{id}"),
        }
    }

    /// The id of the channel's target entity.
    pub fn target_id(&self) -> Uuid {
        match self {
            Self::Workspace(id) | Self::Board(id) | Self::BoardPresence(id) => *id,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_kind() {
        let id = Uuid::new_v4();
        for channel in [
            Channel::Workspace(id),
            Channel::Board(id),
            Channel::BoardPresence(id),
        ] {
            assert_eq!(Channel::parse(&channel.name()).unwrap(), channel);
        }
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let name = format!("card.{}", Uuid::new_v4());
        assert!(matches!(
            Channel::parse(&name),
            Err(ChannelError::UnknownKind(_))
        ));
    }

    #[test]
    fn parse_rejects_malformed_names() {
        for name in ["workspace", "board.not-a-uuid", ""] {
            assert!(matches!(
                Channel::parse(name),
                Err(ChannelError::MalformedName(_))
            ));
        }
    }

    #[test]
    fn presence_prefix_does_not_collide_with_board() {
        let id = Uuid::new_v4();
        let parsed = Channel::parse(&format!("presence-board.{id}")).unwrap();
        assert_eq!(parsed, Channel::BoardPresence(id));
        assert_eq!(parsed.target_id(), id);
    }
}
