//! Action legality. Everything here is a pure function of the board and the
//! acting player: a proposed [`Action`] either yields the [`Delta`] the engine
//! should apply, or the [`Rejection`] explaining why it cannot.
//!
//! Which engine phase accepts which action is decided by the engine, not here.

use super::action::{Action, CardRef, CardTransfer, Delta, Destination};
use super::board::Board;
use super::card::{DevelopmentCard, Tier};
use super::error::Rejection;
use super::gem::Gem;
use super::noble::{Noble, NobleId};
use super::player::Player;
use super::tokens::{TokenPool, MAX_TOKENS_HELD};

const MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS: u8 = 4;

pub fn validate(board: &Board, player: &Player, action: &Action) -> Result<Delta, Rejection> {
    match action {
        Action::TakeThreeDistinct(gems) => take_three_distinct(board, gems),
        Action::TakeTwoSame(gem) => take_two_same(board, *gem),
        Action::Reserve(card_ref) => reserve(board, player, *card_ref),
        Action::Purchase(card_ref) => purchase(board, player, *card_ref),
        Action::Discard(selection) => discard(player, selection),
        Action::ChooseNoble(noble_id) => choose_noble(board, player, *noble_id),
    }
}

fn take_three_distinct(board: &Board, gems: &[Gem]) -> Result<Delta, Rejection> {
    if gems.len() != 3 {
        return Err(Rejection::InvalidActionShape(format!(
            "take_three_distinct needs exactly 3 gems, got {}",
            gems.len()
        )));
    }
    if gems.iter().any(|gem| gem.is_gold()) {
        return Err(Rejection::InvalidActionShape(
            "gold cannot be taken from the supply".into(),
        ));
    }
    let wanted = TokenPool::from_gems(gems);
    if wanted.iter().any(|(_, count)| count > 1) {
        return Err(Rejection::InvalidActionShape(
            "take_three_distinct needs three different colours".into(),
        ));
    }

    for gem in gems {
        let available = board.supply_of(*gem);
        if available < 1 {
            return Err(Rejection::InsufficientSupply {
                gem: *gem,
                available,
                required: 1,
            });
        }
    }

    Ok(Delta::gain(wanted))
}

fn take_two_same(board: &Board, gem: Gem) -> Result<Delta, Rejection> {
    if gem.is_gold() {
        return Err(Rejection::InvalidActionShape(
            "gold cannot be taken from the supply".into(),
        ));
    }
    let available = board.supply_of(gem);
    if available < MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS {
        return Err(Rejection::InsufficientSupply {
            gem,
            available,
            required: MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS,
        });
    }

    Ok(Delta::gain(TokenPool::single(gem, 2)))
}

fn reserve(board: &Board, player: &Player, card_ref: CardRef) -> Result<Delta, Rejection> {
    if let CardRef::Reserved(_) = card_ref {
        return Err(Rejection::InvalidActionShape(
            "a reserved card cannot be reserved again".into(),
        ));
    }
    if !player.can_reserve() {
        return Err(Rejection::ReservationLimitReached {
            held: player.reserved.len(),
        });
    }

    let card = match card_ref {
        CardRef::Display(card_id) => board.find_on_display(card_id),
        CardRef::Deck(tier) => board.pile_top(tier),
        CardRef::Reserved(_) => None,
    }
    .ok_or(Rejection::CardNotFound(card_ref))?;

    let gained = if board.supply_of(Gem::Gold) > 0 {
        TokenPool::single(Gem::Gold, 1)
    } else {
        TokenPool::empty()
    };

    Ok(Delta {
        gained,
        card: Some(CardTransfer {
            card: card.id,
            source: card_ref,
            destination: Destination::Reserved,
        }),
        ..Default::default()
    })
}

fn purchase(board: &Board, player: &Player, card_ref: CardRef) -> Result<Delta, Rejection> {
    let card = match card_ref {
        CardRef::Display(card_id) => board.find_on_display(card_id),
        CardRef::Reserved(card_id) => player.reserved_card(card_id),
        CardRef::Deck(_) => {
            return Err(Rejection::InvalidActionShape(
                "cards must be reserved before buying them from a pile".into(),
            ))
        }
    }
    .ok_or(Rejection::CardNotFound(card_ref))?;

    let returned = payment(card, &player.bonuses(), &player.tokens)?;

    Ok(Delta {
        returned,
        card: Some(CardTransfer {
            card: card.id,
            source: card_ref,
            destination: Destination::Owned,
        }),
        ..Default::default()
    })
}

/// Tokens spent on `card`: coloured tokens first, gold for whatever remains
/// after the bonus discount.
pub fn payment(
    card: &DevelopmentCard,
    bonuses: &TokenPool,
    tokens: &TokenPool,
) -> Result<TokenPool, Rejection> {
    let mut paid = TokenPool::empty();
    let mut gold_needed = 0;

    for gem in Gem::COLORED {
        let required = card.cost.get(gem).saturating_sub(bonuses.get(gem));
        let from_tokens = required.min(tokens.get(gem));
        paid.set(gem, from_tokens);
        gold_needed += required - from_tokens;
    }

    let gold_held = tokens.get(Gem::Gold);
    if gold_needed > gold_held {
        return Err(Rejection::CannotAfford {
            gold_needed,
            gold_held,
        });
    }
    paid.set(Gem::Gold, gold_needed);

    Ok(paid)
}

fn discard(player: &Player, selection: &TokenPool) -> Result<Delta, Rejection> {
    let required = player.token_count().saturating_sub(MAX_TOKENS_HELD);
    let exact = required > 0 && selection.total() == required;
    if !exact || !player.tokens.covers(selection) {
        return Err(Rejection::InvalidDiscardAmount {
            required,
            offered: *selection,
        });
    }

    Ok(Delta::give_back(*selection))
}

fn choose_noble(board: &Board, player: &Player, noble_id: NobleId) -> Result<Delta, Rejection> {
    let noble = board
        .noble(noble_id)
        .ok_or(Rejection::NobleNotFound(noble_id))?;
    if !player.bonuses().covers(&noble.requirement) {
        return Err(Rejection::NobleNotEligible(noble_id));
    }

    Ok(Delta::noble_visit(noble_id))
}

/// Nobles still on the board whose requirement the player's bonuses meet.
pub fn eligible_nobles<'a>(board: &'a Board, player: &Player) -> Vec<&'a Noble> {
    let bonuses = player.bonuses();
    board
        .nobles()
        .iter()
        .filter(|noble| bonuses.covers(&noble.requirement))
        .collect()
}

/// Every regular-turn action [`validate`] would accept right now.
pub fn legal_actions(board: &Board, player: &Player) -> Vec<Action> {
    let mut candidates = vec![];

    let available: Vec<Gem> = Gem::COLORED
        .into_iter()
        .filter(|gem| board.supply_of(*gem) > 0)
        .collect();
    for (i, first) in available.iter().enumerate() {
        for (j, second) in available.iter().enumerate().skip(i + 1) {
            for third in available.iter().skip(j + 1) {
                candidates.push(Action::TakeThreeDistinct(vec![*first, *second, *third]));
            }
        }
    }

    candidates.extend(Gem::COLORED.into_iter().map(Action::TakeTwoSame));

    for card in board.face_up() {
        candidates.push(Action::Reserve(CardRef::Display(card.id)));
        candidates.push(Action::Purchase(CardRef::Display(card.id)));
    }
    candidates.extend(
        Tier::ALL
            .into_iter()
            .map(|tier| Action::Reserve(CardRef::Deck(tier))),
    );
    candidates.extend(
        player
            .reserved
            .iter()
            .map(|reservation| Action::Purchase(CardRef::Reserved(reservation.card.id))),
    );

    candidates
        .into_iter()
        .filter(|action| validate(board, player, action).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::card::CardId;
    use crate::player::Reservation;

    fn get_card(id: u8, cost: TokenPool) -> DevelopmentCard {
        DevelopmentCard::new(CardId::new(id), Tier::One, Gem::Red, 1, cost)
    }

    fn get_owned(id: u8, bonus: Gem) -> DevelopmentCard {
        DevelopmentCard::new(CardId::new(id), Tier::One, bonus, 0, TokenPool::empty())
    }

    /// Tier one shows `display` in order; tier two shows four cards and
    /// keeps card 50 on its pile.
    fn get_board(supply: TokenPool, display: Vec<DevelopmentCard>) -> Board {
        let mut pile = display;
        pile.reverse();
        let tier_two = (50..55)
            .map(|id| {
                DevelopmentCard::new(
                    CardId::new(id),
                    Tier::Two,
                    Gem::Green,
                    2,
                    TokenPool::new(0, 0, 5, 0, 0, 0),
                )
            })
            .collect();
        let piles = BTreeMap::from([(Tier::One, pile), (Tier::Two, tier_two)]);
        Board::new(supply, piles, vec![])
    }

    fn get_default_board() -> Board {
        get_board(
            TokenPool::new(4, 4, 4, 4, 4, 5),
            vec![
                get_card(1, TokenPool::new(1, 1, 0, 0, 0, 0)),
                get_card(2, TokenPool::new(0, 3, 0, 0, 0, 0)),
                get_card(3, TokenPool::new(0, 0, 2, 2, 0, 0)),
            ],
        )
    }

    fn get_player() -> Player {
        Player::new(0, "ada")
    }

    #[test]
    fn can_take_three_distinct() {
        let board = get_default_board();
        let action = Action::TakeThreeDistinct(vec![Gem::White, Gem::Blue, Gem::Green]);

        let delta = validate(&board, &get_player(), &action).unwrap();
        assert_eq!(delta.gained, TokenPool::new(1, 1, 1, 0, 0, 0));
        assert!(delta.returned.is_empty());
        assert_eq!(delta.card, None);
    }

    #[test]
    fn take_three_distinct_rejects_bad_shapes() {
        let board = get_default_board();
        let player = get_player();
        for gems in [
            vec![Gem::White, Gem::Blue],
            vec![Gem::White, Gem::Blue, Gem::Green, Gem::Red],
            vec![Gem::White, Gem::Blue, Gem::Gold],
            vec![Gem::White, Gem::White, Gem::Blue],
        ] {
            let result = validate(&board, &player, &Action::TakeThreeDistinct(gems));
            assert!(matches!(result, Err(Rejection::InvalidActionShape(_))));
        }
    }

    #[test]
    fn take_three_distinct_needs_supply_of_each() {
        let board = get_board(TokenPool::new(1, 0, 1, 1, 1, 5), vec![]);
        let action = Action::TakeThreeDistinct(vec![Gem::White, Gem::Blue, Gem::Green]);

        let result = validate(&board, &get_player(), &action);
        assert_eq!(
            result,
            Err(Rejection::InsufficientSupply {
                gem: Gem::Blue,
                available: 0,
                required: 1
            })
        );
    }

    #[test]
    fn cannot_take_two_of_the_same_when_the_stack_is_almost_empty() {
        let board = get_board(TokenPool::new(4, 3, 4, 4, 4, 5), vec![]);
        let player = get_player();

        let delta = validate(&board, &player, &Action::TakeTwoSame(Gem::White)).unwrap();
        assert_eq!(delta.gained, TokenPool::single(Gem::White, 2));

        let result = validate(&board, &player, &Action::TakeTwoSame(Gem::Blue));
        assert_eq!(
            result,
            Err(Rejection::InsufficientSupply {
                gem: Gem::Blue,
                available: 3,
                required: 4
            })
        );

        let result = validate(&board, &player, &Action::TakeTwoSame(Gem::Gold));
        assert!(matches!(result, Err(Rejection::InvalidActionShape(_))));
    }

    #[test]
    fn can_reserve_card_from_board_and_get_gold() {
        let board = get_default_board();
        let action = Action::Reserve(CardRef::Display(CardId::new(2)));

        let delta = validate(&board, &get_player(), &action).unwrap();
        assert_eq!(delta.gained, TokenPool::single(Gem::Gold, 1));
        assert_eq!(
            delta.card,
            Some(CardTransfer {
                card: CardId::new(2),
                source: CardRef::Display(CardId::new(2)),
                destination: Destination::Reserved,
            })
        );
    }

    #[test]
    fn do_not_get_gold_if_there_is_none() {
        let board = get_board(TokenPool::new(4, 4, 4, 4, 4, 0), vec![]);
        let action = Action::Reserve(CardRef::Deck(Tier::Two));

        let delta = validate(&board, &get_player(), &action).unwrap();
        assert!(delta.gained.is_empty());
        assert_eq!(delta.card.map(|transfer| transfer.card), Some(CardId::new(50)));
    }

    #[test]
    fn cannot_reserve_more_than_3() {
        let board = get_default_board();
        let reservation = Reservation {
            card: get_card(9, TokenPool::empty()),
            blind: false,
        };
        let player = Player {
            reserved: vec![reservation.clone(), reservation.clone(), reservation],
            ..get_player()
        };

        let result = validate(&board, &player, &Action::Reserve(CardRef::Display(CardId::new(1))));
        assert_eq!(result, Err(Rejection::ReservationLimitReached { held: 3 }));
    }

    #[test]
    fn cannot_reserve_card_that_does_not_exist() {
        let board = get_default_board();
        let player = get_player();

        let missing = CardRef::Display(CardId::new(255));
        let result = validate(&board, &player, &Action::Reserve(missing));
        assert_eq!(result, Err(Rejection::CardNotFound(missing)));

        let empty_pile = CardRef::Deck(Tier::Three);
        let result = validate(&board, &player, &Action::Reserve(empty_pile));
        assert_eq!(result, Err(Rejection::CardNotFound(empty_pile)));

        let result = validate(
            &board,
            &player,
            &Action::Reserve(CardRef::Reserved(CardId::new(1))),
        );
        assert!(matches!(result, Err(Rejection::InvalidActionShape(_))));
    }

    #[test]
    fn prioritize_bonuses_over_tokens() {
        // bonus blue 2, one blue token, cost blue 3: one blue token, no gold.
        let card = get_card(2, TokenPool::new(0, 3, 0, 0, 0, 0));
        let board = get_board(TokenPool::new(4, 4, 4, 4, 4, 5), vec![card]);
        let player = Player {
            tokens: TokenPool::single(Gem::Blue, 1),
            owned: vec![get_owned(80, Gem::Blue), get_owned(81, Gem::Blue)],
            ..get_player()
        };

        let delta =
            validate(&board, &player, &Action::Purchase(CardRef::Display(CardId::new(2)))).unwrap();
        assert_eq!(delta.returned, TokenPool::single(Gem::Blue, 1));
        assert_eq!(delta.returned.get(Gem::Gold), 0);
        assert_eq!(delta.card.map(|t| t.destination), Some(Destination::Owned));
    }

    #[test]
    fn can_buy_using_gold_when_needed() {
        let card = get_card(1, TokenPool::new(0, 1, 2, 1, 1, 0));
        let tokens = TokenPool::new(0, 1, 0, 1, 2, 2);
        let bonuses = TokenPool::empty();

        let paid = payment(&card, &bonuses, &tokens).unwrap();
        assert_eq!(paid, TokenPool::new(0, 1, 0, 1, 1, 2));
    }

    #[test]
    fn cannot_buy_if_there_is_not_enough_funds() {
        let card = get_card(1, TokenPool::new(0, 1, 2, 1, 1, 0));
        let tokens = TokenPool::new(0, 0, 0, 1, 1, 1);
        let bonuses = TokenPool::new(0, 1, 0, 0, 0, 0);

        let result = payment(&card, &bonuses, &tokens);
        assert_eq!(
            result,
            Err(Rejection::CannotAfford {
                gold_needed: 2,
                gold_held: 1
            })
        );
    }

    #[test]
    fn can_buy_a_reserved_card() {
        let card = get_card(9, TokenPool::new(2, 0, 0, 0, 0, 0));
        let board = get_default_board();
        let player = Player {
            tokens: TokenPool::new(1, 0, 0, 0, 0, 1),
            reserved: vec![Reservation { card, blind: true }],
            ..get_player()
        };

        let source = CardRef::Reserved(CardId::new(9));
        let delta = validate(&board, &player, &Action::Purchase(source)).unwrap();
        assert_eq!(delta.returned, TokenPool::new(1, 0, 0, 0, 0, 1));
        assert_eq!(delta.card.map(|t| t.source), Some(source));

        // Someone else's reserved card, or a face-up card, is not found there.
        let other = CardRef::Reserved(CardId::new(1));
        let result = validate(&board, &player, &Action::Purchase(other));
        assert_eq!(result, Err(Rejection::CardNotFound(other)));

        let result = validate(&board, &player, &Action::Purchase(CardRef::Deck(Tier::One)));
        assert!(matches!(result, Err(Rejection::InvalidActionShape(_))));
    }

    #[test]
    fn discard_must_return_exactly_the_excess() {
        let player = Player {
            tokens: TokenPool::new(2, 2, 2, 3, 2, 0),
            ..get_player()
        };
        let board = get_default_board();

        let delta =
            validate(&board, &player, &Action::Discard(TokenPool::single(Gem::Red, 1))).unwrap();
        assert_eq!(delta.returned, TokenPool::single(Gem::Red, 1));

        for offered in [
            TokenPool::single(Gem::Red, 0),
            TokenPool::single(Gem::Red, 2),
            TokenPool::single(Gem::Gold, 1),
        ] {
            let result = validate(&board, &player, &Action::Discard(offered));
            assert_eq!(
                result,
                Err(Rejection::InvalidDiscardAmount {
                    required: 1,
                    offered
                })
            );
        }
    }

    #[test]
    fn discard_is_never_legal_at_or_below_the_limit() {
        let player = Player {
            tokens: TokenPool::new(2, 2, 2, 2, 2, 0),
            ..get_player()
        };
        let result = validate(
            &get_default_board(),
            &player,
            &Action::Discard(TokenPool::single(Gem::Red, 1)),
        );
        assert!(matches!(
            result,
            Err(Rejection::InvalidDiscardAmount { required: 0, .. })
        ));
    }

    #[test]
    fn choose_noble_checks_board_and_bonuses() {
        let noble = Noble::new(NobleId::new(3), TokenPool::new(0, 0, 0, 2, 0, 0));
        let board = Board::new(TokenPool::empty(), BTreeMap::new(), vec![noble]);
        let qualified = Player {
            owned: vec![get_owned(1, Gem::Red), get_owned(2, Gem::Red)],
            ..get_player()
        };

        let delta = validate(&board, &qualified, &Action::ChooseNoble(NobleId::new(3))).unwrap();
        assert_eq!(delta.noble, Some(NobleId::new(3)));
        assert_eq!(eligible_nobles(&board, &qualified).len(), 1);

        let result = validate(&board, &get_player(), &Action::ChooseNoble(NobleId::new(3)));
        assert_eq!(result, Err(Rejection::NobleNotEligible(NobleId::new(3))));
        assert!(eligible_nobles(&board, &get_player()).is_empty());

        let result = validate(&board, &qualified, &Action::ChooseNoble(NobleId::new(9)));
        assert_eq!(result, Err(Rejection::NobleNotFound(NobleId::new(9))));
    }

    #[test]
    fn legal_actions_only_lists_accepted_actions() {
        let board = get_board(
            TokenPool::new(4, 1, 1, 0, 0, 5),
            vec![
                get_card(1, TokenPool::new(1, 0, 0, 0, 0, 0)),
                get_card(2, TokenPool::new(0, 0, 0, 0, 4, 0)),
            ],
        );
        let player = Player {
            tokens: TokenPool::single(Gem::White, 1),
            ..get_player()
        };

        let actions = legal_actions(&board, &player);
        assert!(actions.contains(&Action::TakeThreeDistinct(vec![
            Gem::White,
            Gem::Blue,
            Gem::Green
        ])));
        assert_eq!(
            actions
                .iter()
                .filter(|a| matches!(a, Action::TakeThreeDistinct(_)))
                .count(),
            1
        );
        assert!(actions.contains(&Action::TakeTwoSame(Gem::White)));
        assert!(!actions.contains(&Action::TakeTwoSame(Gem::Blue)));
        assert!(actions.contains(&Action::Purchase(CardRef::Display(CardId::new(1)))));
        assert!(!actions.contains(&Action::Purchase(CardRef::Display(CardId::new(2)))));
        assert!(actions.contains(&Action::Reserve(CardRef::Deck(Tier::Two))));
        assert!(!actions.contains(&Action::Reserve(CardRef::Deck(Tier::Three))));
        for action in &actions {
            assert!(validate(&board, &player, action).is_ok());
        }
    }
}
