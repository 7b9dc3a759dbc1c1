use serde::{Deserialize, Serialize};

/// Number of turns callers conventionally keep
pub const DEFAULT_HISTORY_CAP: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One prior exchange in a caller-owned conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Returns a new history with `turn` appended, keeping only the last `cap` entries
///
/// The input slice is left untouched.
pub fn append_turn(
    history: &[ConversationTurn],
    turn: ConversationTurn,
    cap: usize,
) -> Vec<ConversationTurn> {
    let mut next: Vec<ConversationTurn> = history.to_vec();
    next.push(turn);
    if next.len() > cap {
        next.drain(..next.len() - cap);
    }
    next
}
