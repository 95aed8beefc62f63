//! Legality predicates shared by every advisory query.
//!
//! All functions here are total: an impossible move is `false`, never an error.

use crate::card::Card;
use crate::state::{GameVariant, Pile};

pub fn can_move_to_foundation(card: &Card, foundation: &[Card]) -> bool {
    match foundation.last() {
        None => card.is_ace(),
        Some(top) => top.suit() == card.suit() && card.rank() == top.rank() + 1,
    }
}

/// The only difference between variants is what an empty pile accepts:
/// Klondike takes a King only, FreeCell takes anything.
pub fn can_move_to_tableau(card: &Card, pile: &[Card], variant: GameVariant) -> bool {
    match pile.last() {
        None => match variant {
            GameVariant::Klondike => card.is_king(),
            GameVariant::FreeCell => true,
        },
        Some(top) => {
            top.face_up && top.is_red() != card.is_red() && card.rank() + 1 == top.rank()
        }
    }
}

pub fn can_move_to_free_cell(slot: Option<&Card>) -> bool {
    slot.is_none()
}

pub fn is_valid_descending_alternating_sequence(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| {
        let (upper, lower) = (pair[0], pair[1]);
        upper.rank() == lower.rank() + 1 && upper.is_red() != lower.is_red()
    })
}

/// How many cards a single FreeCell transfer may carry:
/// `(empty free cells + 1) * 2^(empty tableau piles)`.
///
/// An empty destination pile is not counted, since the run lands there and
/// cannot also be used as staging space.
pub fn max_free_cell_transfer_count(
    free_cells: &[Option<Card>],
    tableau: &[Pile],
    destination: Option<usize>,
) -> usize {
    let empty_cells = free_cells.iter().filter(|slot| slot.is_none()).count();
    let empty_piles = tableau
        .iter()
        .enumerate()
        .filter(|&(idx, pile)| pile.is_empty() && Some(idx) != destination)
        .count();
    (empty_cells + 1) << empty_piles
}
