use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::gem::Gem;

/// Most tokens a player may keep at the end of a turn.
pub const MAX_TOKENS_HELD: u8 = 10;

/// Per-kind token counts, used both for the shared supply and for a
/// player's holdings. Card costs and noble requirements reuse it with the
/// gold slot left at zero.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Gem, u8>", into = "BTreeMap<Gem, u8>")]
pub struct TokenPool {
    counts: [u8; 6],
}

/// Subtraction would drive this kind below zero.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Shortfall(pub Gem);

impl TokenPool {
    pub fn new(white: u8, blue: u8, green: u8, red: u8, black: u8, gold: u8) -> Self {
        Self {
            counts: [white, blue, green, red, black, gold],
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(gem: Gem, count: u8) -> Self {
        let mut pool = Self::empty();
        pool.set(gem, count);
        pool
    }

    pub fn from_gems(gems: &[Gem]) -> Self {
        let mut pool = Self::empty();
        for gem in gems {
            pool.counts[gem.index()] += 1;
        }
        pool
    }

    pub fn get(&self, gem: Gem) -> u8 {
        self.counts[gem.index()]
    }

    pub fn set(&mut self, gem: Gem, count: u8) {
        self.counts[gem.index()] = count;
    }

    /// Saturates at `u8::MAX`; an untrusted selection may claim more.
    pub fn total(&self) -> u8 {
        self.counts
            .iter()
            .fold(0u8, |sum, count| sum.saturating_add(*count))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// True when every kind holds at least as many as `requirement` asks for.
    pub fn covers(&self, requirement: &TokenPool) -> bool {
        Gem::ALL
            .iter()
            .all(|gem| self.get(*gem) >= requirement.get(*gem))
    }

    /// Non-zero entries in [`Gem::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Gem, u8)> + '_ {
        Gem::ALL
            .into_iter()
            .map(|gem| (gem, self.get(gem)))
            .filter(|(_, count)| *count > 0)
    }
}

impl Sub<TokenPool> for TokenPool {
    type Output = Result<Self, Shortfall>;

    fn sub(self, rhs: TokenPool) -> Self::Output {
        let mut remaining = self;
        for gem in Gem::ALL {
            let current = self.get(gem);
            let taken = rhs.get(gem);
            if taken > current {
                return Err(Shortfall(gem));
            }
            remaining.set(gem, current - taken);
        }
        Ok(remaining)
    }
}

impl Add<TokenPool> for TokenPool {
    type Output = TokenPool;

    fn add(self, rhs: TokenPool) -> Self::Output {
        let mut sum = self;
        for gem in Gem::ALL {
            sum.set(gem, self.get(gem) + rhs.get(gem));
        }
        sum
    }
}

impl From<BTreeMap<Gem, u8>> for TokenPool {
    fn from(map: BTreeMap<Gem, u8>) -> Self {
        let mut pool = Self::empty();
        for (gem, count) in map {
            pool.set(gem, count);
        }
        pool
    }
}

impl From<TokenPool> for BTreeMap<Gem, u8> {
    fn from(pool: TokenPool) -> Self {
        pool.iter().collect()
    }
}

impl From<TokenPool> for Vec<Gem> {
    fn from(pool: TokenPool) -> Self {
        pool.iter()
            .flat_map(|(gem, count)| std::iter::repeat(gem).take(count as usize))
            .collect()
    }
}

impl fmt::Display for TokenPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(gem, count)| format!("{gem}:{count}"))
            .collect();
        f.write_str(&parts.join(" "))
    }
}
