//! The standard deck: 40 / 30 / 20 development cards by tier and ten nobles.
//!
//! Costs below are listed as `[white, blue, green, red, black]`.

use once_cell::sync::Lazy;

use crate::card::{CardId, DevelopmentCard, Tier};
use crate::gem::Gem;
use crate::noble::{Noble, NobleId};
use crate::tokens::TokenPool;

type CardRow = (Gem, u8, [u8; 5]);

static STANDARD: Lazy<Catalog> = Lazy::new(Catalog::build);

#[derive(Debug)]
pub struct Catalog {
    cards: Vec<DevelopmentCard>,
    nobles: Vec<Noble>,
}

impl Catalog {
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    fn build() -> Self {
        let mut cards = Vec::with_capacity(TIER_ONE.len() + TIER_TWO.len() + TIER_THREE.len());
        let mut next_id = 0;
        for (tier, rows) in [
            (Tier::One, TIER_ONE),
            (Tier::Two, TIER_TWO),
            (Tier::Three, TIER_THREE),
        ] {
            for (bonus, points, cost) in rows {
                next_id += 1;
                cards.push(DevelopmentCard::new(
                    CardId::new(next_id),
                    tier,
                    *bonus,
                    *points,
                    colored(cost),
                ));
            }
        }

        let nobles = NOBLES
            .iter()
            .zip(1..)
            .map(|(requirement, id)| Noble::new(NobleId::new(id), colored(requirement)))
            .collect();

        Self { cards, nobles }
    }

    pub fn cards(&self) -> &[DevelopmentCard] {
        &self.cards
    }

    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &DevelopmentCard> {
        self.cards.iter().filter(move |card| card.tier == tier)
    }

    pub fn nobles(&self) -> &[Noble] {
        &self.nobles
    }
}

fn colored(cost: &[u8; 5]) -> TokenPool {
    let [white, blue, green, red, black] = *cost;
    TokenPool::new(white, blue, green, red, black, 0)
}

const TIER_ONE: &[CardRow] = &[
    (Gem::Green, 0, [2, 2, 0, 0, 0]),
    (Gem::Green, 0, [1, 1, 0, 1, 2]),
    (Gem::Green, 0, [1, 1, 0, 1, 1]),
    (Gem::Black, 0, [0, 0, 3, 0, 0]),
    (Gem::Black, 1, [0, 4, 0, 0, 0]),
    (Gem::Black, 0, [1, 2, 1, 1, 0]),
    (Gem::Blue, 0, [0, 1, 3, 1, 0]),
    (Gem::Blue, 0, [1, 0, 1, 2, 1]),
    (Gem::Blue, 0, [0, 0, 2, 0, 2]),
    (Gem::White, 0, [0, 2, 0, 0, 2]),
    (Gem::Red, 0, [3, 0, 0, 0, 0]),
    (Gem::Green, 1, [0, 0, 0, 0, 4]),
    (Gem::Green, 0, [1, 3, 1, 0, 0]),
    (Gem::Green, 0, [0, 1, 0, 2, 2]),
    (Gem::Red, 0, [1, 0, 0, 1, 3]),
    (Gem::Red, 1, [4, 0, 0, 0, 0]),
    (Gem::White, 0, [0, 3, 0, 0, 0]),
    (Gem::Black, 0, [0, 0, 2, 2, 0]),
    (Gem::Black, 0, [0, 0, 1, 3, 1]),
    (Gem::Black, 0, [2, 0, 2, 0, 0]),
    (Gem::Blue, 0, [1, 0, 1, 1, 1]),
    (Gem::Blue, 1, [0, 0, 0, 4, 0]),
    (Gem::Red, 0, [2, 0, 1, 0, 2]),
    (Gem::Red, 0, [2, 0, 0, 2, 0]),
    (Gem::Red, 0, [0, 2, 1, 0, 0]),
    (Gem::Black, 0, [2, 2, 0, 1, 0]),
    (Gem::Blue, 0, [1, 0, 2, 2, 0]),
    (Gem::Blue, 0, [0, 0, 0, 0, 3]),
    (Gem::White, 0, [2, 2, 0, 0, 1]),
    (Gem::White, 0, [0, 1, 1, 1, 1]),
    (Gem::Blue, 0, [1, 0, 0, 0, 2]),
    (Gem::Black, 0, [1, 1, 1, 1, 0]),
    (Gem::Green, 0, [0, 2, 0, 2, 0]),
    (Gem::Green, 0, [0, 0, 0, 3, 0]),
    (Gem::White, 0, [0, 1, 2, 1, 1]),
    (Gem::White, 0, [0, 0, 0, 2, 1]),
    (Gem::White, 0, [3, 1, 0, 0, 1]),
    (Gem::White, 1, [0, 0, 4, 0, 0]),
    (Gem::Red, 0, [2, 1, 1, 0, 1]),
    (Gem::Red, 0, [1, 1, 1, 0, 1]),
];

const TIER_TWO: &[CardRow] = &[
    (Gem::Black, 1, [3, 0, 3, 0, 2]),
    (Gem::Green, 1, [3, 0, 2, 3, 0]),
    (Gem::Red, 1, [0, 3, 0, 2, 3]),
    (Gem::Blue, 3, [0, 6, 0, 0, 0]),
    (Gem::Blue, 2, [2, 0, 0, 1, 4]),
    (Gem::White, 1, [2, 3, 0, 3, 0]),
    (Gem::Green, 2, [4, 2, 0, 0, 1]),
    (Gem::Blue, 2, [0, 5, 0, 0, 0]),
    (Gem::Black, 2, [5, 0, 0, 0, 0]),
    (Gem::Red, 1, [2, 0, 0, 2, 3]),
    (Gem::White, 3, [6, 0, 0, 0, 0]),
    (Gem::Red, 2, [1, 4, 2, 0, 0]),
    (Gem::White, 2, [0, 0, 0, 5, 0]),
    (Gem::Green, 3, [0, 0, 6, 0, 0]),
    (Gem::Green, 2, [0, 0, 5, 0, 0]),
    (Gem::Red, 2, [0, 0, 0, 0, 5]),
    (Gem::Black, 1, [3, 2, 2, 0, 0]),
    (Gem::Black, 3, [0, 0, 0, 0, 6]),
    (Gem::Black, 2, [0, 0, 5, 3, 0]),
    (Gem::Green, 2, [0, 5, 3, 0, 0]),
    (Gem::Blue, 1, [0, 2, 3, 0, 3]),
    (Gem::Blue, 1, [0, 2, 2, 2, 0]),
    (Gem::Blue, 2, [5, 3, 0, 0, 0]),
    (Gem::Green, 1, [2, 3, 0, 0, 2]),
    (Gem::White, 2, [0, 0, 0, 5, 3]),
    (Gem::White, 2, [0, 0, 1, 4, 2]),
    (Gem::Black, 2, [0, 0, 4, 2, 1]),
    (Gem::White, 1, [0, 0, 3, 2, 2]),
    (Gem::Red, 3, [0, 0, 0, 6, 0]),
    (Gem::Red, 2, [3, 0, 0, 0, 5]),
];

const TIER_THREE: &[CardRow] = &[
    (Gem::Green, 3, [5, 3, 0, 3, 3]),
    (Gem::Blue, 3, [3, 0, 3, 3, 5]),
    (Gem::Green, 4, [3, 6, 3, 0, 0]),
    (Gem::White, 5, [3, 0, 0, 0, 7]),
    (Gem::Black, 4, [0, 0, 0, 7, 0]),
    (Gem::Black, 4, [0, 0, 3, 6, 3]),
    (Gem::Blue, 4, [6, 3, 0, 0, 3]),
    (Gem::Red, 4, [0, 0, 7, 0, 0]),
    (Gem::Red, 3, [3, 5, 3, 0, 3]),
    (Gem::Red, 4, [0, 3, 6, 3, 0]),
    (Gem::White, 4, [3, 0, 0, 3, 6]),
    (Gem::Black, 3, [3, 3, 5, 3, 0]),
    (Gem::Blue, 5, [7, 3, 0, 0, 0]),
    (Gem::Red, 5, [0, 0, 7, 3, 0]),
    (Gem::Green, 5, [0, 7, 3, 0, 0]),
    (Gem::White, 4, [0, 0, 0, 0, 7]),
    (Gem::Green, 4, [0, 7, 0, 0, 0]),
    (Gem::White, 3, [0, 3, 3, 5, 3]),
    (Gem::Blue, 4, [7, 0, 0, 0, 0]),
    (Gem::Black, 5, [0, 0, 0, 7, 3]),
];

const NOBLES: &[[u8; 5]] = &[
    [0, 4, 4, 0, 0],
    [4, 4, 0, 0, 0],
    [0, 0, 4, 4, 0],
    [4, 0, 0, 0, 4],
    [3, 0, 0, 3, 3],
    [0, 0, 3, 3, 3],
    [0, 3, 3, 3, 0],
    [0, 0, 0, 4, 4],
    [3, 3, 3, 0, 0],
    [3, 3, 0, 0, 3],
];
