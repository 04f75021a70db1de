use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::card::{CardId, DevelopmentCard, Tier};
use super::catalog::Catalog;
use super::gem::Gem;
use super::noble::{Noble, NobleId};
use super::tokens::TokenPool;

pub const DISPLAY_SLOTS: usize = 4;
pub const GOLD_SUPPLY: u8 = 5;

/// Face-up cards of one tier. A slot stays `None` once its pile runs dry.
pub type Display = [Option<DevelopmentCard>; DISPLAY_SLOTS];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TierRow {
    display: Display,
    /// Face-down pile; the top card is the last element.
    pile: Vec<DevelopmentCard>,
}

impl TierRow {
    fn deal(pile: Vec<DevelopmentCard>) -> Self {
        let mut row = Self {
            display: Default::default(),
            pile,
        };
        row.refill();
        row
    }

    fn refill(&mut self) {
        for slot in self.display.iter_mut().filter(|slot| slot.is_none()) {
            *slot = self.pile.pop();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    supply: TokenPool,
    rows: [TierRow; 3],
    nobles: Vec<Noble>,
}

impl Board {
    /// Deals up to four face-up cards per tier from the top of each pile.
    pub fn new(
        supply: TokenPool,
        mut piles: BTreeMap<Tier, Vec<DevelopmentCard>>,
        nobles: Vec<Noble>,
    ) -> Self {
        let rows = Tier::ALL.map(|tier| TierRow::deal(piles.remove(&tier).unwrap_or_default()));
        Self {
            supply,
            rows,
            nobles,
        }
    }

    /// Standard setup: shuffled catalog piles and `players + 1` random nobles.
    pub fn setup<R: Rng + ?Sized>(players: usize, rng: &mut R) -> Self {
        let catalog = Catalog::standard();
        let mut piles = BTreeMap::new();
        for tier in Tier::ALL {
            let mut pile: Vec<DevelopmentCard> = catalog.tier(tier).cloned().collect();
            pile.shuffle(rng);
            piles.insert(tier, pile);
        }
        let nobles = catalog
            .nobles()
            .choose_multiple(rng, players + 1)
            .cloned()
            .collect();

        Self::new(Self::starting_supply(players), piles, nobles)
    }

    pub fn starting_supply(players: usize) -> TokenPool {
        let colored = match players {
            0..=2 => 4,
            3 => 5,
            _ => 7,
        };
        TokenPool::new(colored, colored, colored, colored, colored, GOLD_SUPPLY)
    }

    pub fn supply(&self) -> TokenPool {
        self.supply
    }

    pub(crate) fn set_supply(&mut self, supply: TokenPool) {
        self.supply = supply;
    }

    pub fn display(&self, tier: Tier) -> &Display {
        &self.rows[tier.index()].display
    }

    pub fn face_up(&self) -> impl Iterator<Item = &DevelopmentCard> {
        self.rows.iter().flat_map(|row| row.display.iter().flatten())
    }

    pub fn find_on_display(&self, card_id: CardId) -> Option<&DevelopmentCard> {
        self.face_up().find(|card| card.id == card_id)
    }

    pub fn pile_top(&self, tier: Tier) -> Option<&DevelopmentCard> {
        self.rows[tier.index()].pile.last()
    }

    pub fn pile_size(&self, tier: Tier) -> usize {
        self.rows[tier.index()].pile.len()
    }

    pub fn nobles(&self) -> &[Noble] {
        &self.nobles
    }

    pub fn noble(&self, noble_id: NobleId) -> Option<&Noble> {
        self.nobles.iter().find(|noble| noble.id == noble_id)
    }

    pub fn supply_of(&self, gem: Gem) -> u8 {
        self.supply.get(gem)
    }

    /// Removes a face-up card and refills its slot from the same tier's pile.
    pub(crate) fn take_from_display(&mut self, card_id: CardId) -> Option<DevelopmentCard> {
        for row in self.rows.iter_mut() {
            let slot = row
                .display
                .iter_mut()
                .find(|slot| matches!(slot, Some(card) if card.id == card_id));
            if let Some(slot) = slot {
                let card = slot.take();
                *slot = row.pile.pop();
                return card;
            }
        }
        None
    }

    pub(crate) fn draw(&mut self, tier: Tier) -> Option<DevelopmentCard> {
        self.rows[tier.index()].pile.pop()
    }

    pub(crate) fn take_noble(&mut self, noble_id: NobleId) -> Option<Noble> {
        let position = self.nobles.iter().position(|noble| noble.id == noble_id)?;
        Some(self.nobles.remove(position))
    }
}
