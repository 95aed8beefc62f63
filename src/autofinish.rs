//! Deterministic foundation play for boards that are already decided.

use crate::action::PlannedMove;
use crate::moves::{Destination, Selection, Source, simulated_state};
use crate::rules::can_move_to_foundation;
use crate::state::GameState;

use log::debug;

/// Not yet won, stock and waste empty, and no face-down card anywhere.
pub fn is_auto_finish_candidate(state: &GameState) -> bool {
    !state.is_won()
        && state.stock.is_empty()
        && state.waste.is_empty()
        && state
            .tableau
            .iter()
            .all(|pile| pile.iter().all(|card| card.face_up))
}

/// The next foundation move of the auto-finish sequence: the lowest-ranked
/// playable card, then the lowest tableau pile, then the lowest foundation.
/// Free-cell cards are considered after every tableau pile.
pub fn next_auto_finish_move(state: &GameState) -> Option<PlannedMove> {
    if !is_auto_finish_candidate(state) {
        return None;
    }

    let tableau_tops = state.tableau.iter().enumerate().filter_map(|(pile, cards)| {
        cards.last().map(|card| {
            let source = Source::Tableau {
                pile,
                index: cards.len() - 1,
            };
            (source, *card)
        })
    });
    let free_cells = state
        .free_cells
        .iter()
        .enumerate()
        .filter_map(|(idx, slot)| slot.map(|card| (Source::FreeCell(idx), card)));

    tableau_tops
        .chain(free_cells)
        .enumerate()
        .filter_map(|(order, (source, card))| {
            let foundation = state
                .foundations
                .iter()
                .position(|pile| can_move_to_foundation(&card, pile))?;
            Some((card.rank(), order, foundation, source, card))
        })
        .min_by_key(|&(rank, order, foundation, ..)| (rank, order, foundation))
        .map(|(_, _, foundation, source, card)| {
            PlannedMove::new(
                Selection::new(source, std::slice::from_ref(&card)),
                Destination::Foundation(foundation),
            )
        })
}

/// Plays the auto-finish sequence on a scratch copy; `Some` with every move
/// when it ends in a win.
pub fn auto_finish_plan(state: &GameState) -> Option<Vec<PlannedMove>> {
    if !is_auto_finish_candidate(state) {
        return None;
    }

    let max_moves = state.tableau_card_count() + state.free_cells.iter().flatten().count();
    let mut scratch = state.clone();
    let mut plan = Vec::with_capacity(max_moves);
    for _ in 0..max_moves {
        let Some(mov) = next_auto_finish_move(&scratch) else {
            break;
        };
        let Some(next) = simulated_state(&scratch, &mov.selection, mov.destination) else {
            break;
        };
        scratch = next;
        plan.push(mov);
        if scratch.is_won() {
            return Some(plan);
        }
    }

    debug!(
        "Auto-finish stuck after {} moves with {} cards on foundations",
        plan.len(),
        scratch.foundation_card_count()
    );
    None
}

pub fn can_auto_finish(state: &GameState) -> bool {
    auto_finish_plan(state).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Suit};

    fn replay(state: &GameState, plan: &[PlannedMove]) -> GameState {
        let mut scratch = state.clone();
        for mov in plan {
            scratch = simulated_state(&scratch, &mov.selection, mov.destination).unwrap();
            assert!(scratch.is_valid());
        }
        scratch
    }

    const KINGS_LEFT: &str = r#"Foundation1: Q♠
Foundation2: Q♥
Foundation3: Q♦
Foundation4: Q♣
Tableau1: |K♦
Tableau2: |K♣
Tableau3: |K♠
Tableau4: |K♥"#;

    #[test]
    fn test_kings_left_finish() {
        let state = GameState::parse(KINGS_LEFT).unwrap();
        assert!(state.is_valid());
        assert!(is_auto_finish_candidate(&state));
        assert!(can_auto_finish(&state));

        let first = next_auto_finish_move(&state).unwrap();
        assert_eq!(first.selection.source, Source::Tableau { pile: 0, index: 0 });
        assert_eq!(first.selection.cards[0], Card::face_up(Suit::Diamonds, 13));
        assert_eq!(first.destination, Destination::Foundation(2));

        let plan = auto_finish_plan(&state).unwrap();
        assert_eq!(plan.len(), 4);
        let piles: Vec<Source> = plan.iter().map(|m| m.selection.source).collect();
        assert_eq!(
            piles,
            vec![
                Source::Tableau { pile: 0, index: 0 },
                Source::Tableau { pile: 1, index: 0 },
                Source::Tableau { pile: 2, index: 0 },
                Source::Tableau { pile: 3, index: 0 },
            ]
        );
        assert!(replay(&state, &plan).is_won());
    }

    #[test]
    fn test_lowest_rank_goes_first() {
        const BOARD_STR: &str = r#"Foundation1: T♠
Foundation2: 9♥
Foundation3: Q♦
Foundation4: Q♣
Tableau1: |K♠Q♥J♠T♥
Tableau2: |K♥Q♠J♥
Tableau3: |K♦
Tableau4: |K♣"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        assert!(state.is_valid());
        let first = next_auto_finish_move(&state).unwrap();
        assert_eq!(first.selection.cards[0], Card::face_up(Suit::Hearts, 10));
        assert_eq!(first.selection.source, Source::Tableau { pile: 0, index: 3 });
        assert_eq!(first.destination, Destination::Foundation(1));
        let plan = auto_finish_plan(&state).unwrap();
        assert_eq!(plan.len(), 9);
        assert!(replay(&state, &plan).is_won());
    }

    #[test]
    fn test_tie_on_rank_goes_to_lowest_pile() {
        const BOARD_STR: &str = r#"Foundation1: J♠
Foundation2: Q♥
Foundation3: Q♦
Foundation4: Q♣
Tableau1: |K♠
Tableau2: |K♦Q♠
Tableau3: |K♣
Tableau4: |K♥"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        // K♠ sits on the first pile but can only follow Q♠.
        let first = next_auto_finish_move(&state).unwrap();
        assert_eq!(first.selection.source, Source::Tableau { pile: 1, index: 1 });
        let plan = auto_finish_plan(&state).unwrap();
        assert_eq!(plan[1].selection.source, Source::Tableau { pile: 0, index: 0 });
        assert_eq!(plan[2].selection.source, Source::Tableau { pile: 1, index: 0 });
    }

    #[test]
    fn test_out_of_order_pile_gets_stuck() {
        const BOARD_STR: &str = r#"Foundation1: T♠
Foundation2: Q♥
Foundation3: Q♦
Foundation4: Q♣
Tableau1: |J♠Q♠
Tableau2: |K♠
Tableau3: |K♥
Tableau4: |K♦
Tableau5: |K♣"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        assert!(is_auto_finish_candidate(&state));
        assert!(next_auto_finish_move(&state).is_some());
        assert!(!can_auto_finish(&state));
        assert_eq!(auto_finish_plan(&state), None);
    }

    #[test]
    fn test_freecell_finish_uses_free_cells() {
        const BOARD_STR: &str = r#"Variant: freecell
FreeCell1: K♠
Foundation1: Q♠
Foundation2: K♥
Foundation3: K♦
Foundation4: K♣"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        let mov = next_auto_finish_move(&state).unwrap();
        assert_eq!(mov.selection.source, Source::FreeCell(0));
        assert!(state.is_valid());
        let plan = auto_finish_plan(&state).unwrap();
        assert!(replay(&state, &plan).is_won());
    }
}
