use alloc::borrow::Cow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a server-side opponent behavior.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(Cow<'static, str>);

impl StrategyId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<alloc::string::String> for StrategyId {
    fn from(id: alloc::string::String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Known opponent strategies, in the order they are played.
pub const KNOWN_STRATEGIES: [&str; 10] = [
    "random",
    "minimax_strong",
    "center_first",
    "minimax_soft",
    "corner_first",
    "mirror_user",
    "trap_setter",
    "block_focus",
    "last_move_repeater",
    "early_game_random",
];

/// Position in the fixed strategy cycle, wrapping after the last entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StrategyRotation {
    index: usize,
}

impl StrategyRotation {
    pub const fn current(self) -> StrategyId {
        StrategyId::from_static(KNOWN_STRATEGIES[self.index % KNOWN_STRATEGIES.len()])
    }

    pub fn advance(&mut self) -> StrategyId {
        self.index = (self.index + 1) % KNOWN_STRATEGIES.len();
        let next = self.current();
        log::debug!("next strategy: {}", next);
        next
    }
}
