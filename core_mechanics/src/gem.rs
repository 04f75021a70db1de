use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gem {
    White = 0,
    Blue = 1,
    Green = 2,
    Red = 3,
    Black = 4,
    Gold = 5,
}

impl Gem {
    pub const ALL: [Gem; 6] = [
        Gem::White,
        Gem::Blue,
        Gem::Green,
        Gem::Red,
        Gem::Black,
        Gem::Gold,
    ];

    /// Every kind a card can cost or grant. Gold is only ever a wildcard.
    pub const COLORED: [Gem; 5] = [Gem::White, Gem::Blue, Gem::Green, Gem::Red, Gem::Black];

    pub fn is_gold(self) -> bool {
        self == Gem::Gold
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Gem::White => "white",
            Gem::Blue => "blue",
            Gem::Green => "green",
            Gem::Red => "red",
            Gem::Black => "black",
            Gem::Gold => "gold",
        }
    }
}

impl fmt::Display for Gem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
