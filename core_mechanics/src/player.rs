use serde::{Deserialize, Serialize};

use super::card::{CardId, DevelopmentCard};
use super::gem::Gem;
use super::noble::Noble;
use super::tokens::TokenPool;

pub const MAX_RESERVED_CARDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub card: DevelopmentCard,
    /// Drawn face down from a pile, so only its owner knows what it is.
    pub blind: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub seat: usize,
    pub name: String,
    pub tokens: TokenPool,
    pub owned: Vec<DevelopmentCard>,
    pub reserved: Vec<Reservation>,
    pub nobles: Vec<Noble>,
    pub turns_taken: u32,
}

impl Player {
    pub fn new(seat: usize, name: impl Into<String>) -> Self {
        Self {
            seat,
            name: name.into(),
            tokens: TokenPool::empty(),
            owned: vec![],
            reserved: vec![],
            nobles: vec![],
            turns_taken: 0,
        }
    }

    /// Permanent discount per colour: one per owned card granting it.
    pub fn bonuses(&self) -> TokenPool {
        let mut bonuses = TokenPool::empty();
        for card in &self.owned {
            bonuses.set(card.bonus, bonuses.get(card.bonus) + 1);
        }
        bonuses
    }

    pub fn bonus(&self, gem: Gem) -> u8 {
        self.bonuses().get(gem)
    }

    pub fn token_count(&self) -> u8 {
        self.tokens.total()
    }

    pub fn score(&self) -> u8 {
        let card_points: u8 = self.owned.iter().map(|card| card.points).sum();
        let noble_points: u8 = self.nobles.iter().map(|noble| noble.points).sum();
        card_points + noble_points
    }

    pub fn reserved_card(&self, id: CardId) -> Option<&DevelopmentCard> {
        self.reserved
            .iter()
            .map(|reservation| &reservation.card)
            .find(|card| card.id == id)
    }

    pub(crate) fn take_reserved(&mut self, id: CardId) -> Option<DevelopmentCard> {
        let position = self.reserved.iter().position(|r| r.card.id == id)?;
        Some(self.reserved.remove(position).card)
    }

    pub fn can_reserve(&self) -> bool {
        self.reserved.len() < MAX_RESERVED_CARDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Tier;
    use crate::noble::NobleId;

    fn get_card(id: u8, bonus: Gem, points: u8) -> DevelopmentCard {
        DevelopmentCard::new(
            CardId::new(id),
            Tier::One,
            bonus,
            points,
            TokenPool::new(1, 1, 0, 0, 0, 0),
        )
    }

    #[test]
    fn bonuses_are_derived_from_owned_cards() {
        let player = Player {
            owned: vec![
                get_card(1, Gem::Blue, 0),
                get_card(2, Gem::Blue, 1),
                get_card(3, Gem::Red, 0),
            ],
            ..Player::new(0, "ada")
        };

        assert_eq!(player.bonuses(), TokenPool::new(0, 2, 0, 1, 0, 0));
        assert_eq!(player.bonus(Gem::Blue), 2);
        assert_eq!(player.bonus(Gem::Gold), 0);
    }

    #[test]
    fn score_adds_card_and_noble_points() {
        let player = Player {
            owned: vec![get_card(1, Gem::Blue, 2), get_card(2, Gem::Green, 3)],
            nobles: vec![Noble::new(NobleId::new(1), TokenPool::empty())],
            ..Player::new(0, "ada")
        };

        assert_eq!(player.score(), 8);
    }

    #[test]
    fn taking_a_reserved_card_removes_it() {
        let mut player = Player {
            reserved: vec![
                Reservation {
                    card: get_card(7, Gem::White, 0),
                    blind: false,
                },
                Reservation {
                    card: get_card(8, Gem::Black, 1),
                    blind: true,
                },
            ],
            ..Player::new(1, "bo")
        };

        assert!(player.can_reserve());
        let card = player.take_reserved(CardId::new(8)).unwrap();
        assert_eq!(card.bonus, Gem::Black);
        assert_eq!(player.reserved.len(), 1);
        assert_eq!(player.take_reserved(CardId::new(8)), None);
    }

    #[test]
    fn cannot_reserve_more_than_3() {
        let reservation = Reservation {
            card: get_card(7, Gem::White, 0),
            blind: false,
        };
        let player = Player {
            reserved: vec![reservation.clone(), reservation.clone(), reservation],
            ..Player::new(0, "ada")
        };

        assert!(!player.can_reserve());
    }
}
