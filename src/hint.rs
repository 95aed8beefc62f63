use crate::action::{Hint, PlannedMove};
use crate::advisor::best_advisable_evaluation;
use crate::evaluation::MoveEvaluation;
use crate::moves::{candidate_selections, simulated_stock_tap};
use crate::state::GameState;

use log::debug;

/// The single best advisable move on the board.
///
/// Ties across selections go to the one enumerated first.
pub fn best_hint_move(state: &GameState) -> Option<PlannedMove> {
    let mut best: Option<(PlannedMove, MoveEvaluation)> = None;
    for selection in candidate_selections(state) {
        let Some(evaluation) = best_advisable_evaluation(&selection, state) else {
            continue;
        };
        let better = match &best {
            Some((_, current)) => evaluation > *current,
            None => true,
        };
        if better {
            best = Some((PlannedMove::new(selection, evaluation.destination), evaluation));
        }
    }
    best.map(|(mov, _)| mov)
}

/// The best advisable move, or a stock tap when cycling the stock would
/// expose one within two passes over stock and waste.
pub fn best_hint(state: &GameState) -> Option<Hint> {
    if let Some(mov) = best_hint_move(state) {
        return Some(Hint::Move(mov));
    }
    if !state.variant.has_stock() {
        return None;
    }

    let talon = state.stock.len() + state.waste.len();
    if talon == 0 {
        return None;
    }
    // One pass is a tap per dealt group plus the recycle tap.
    let pass = talon.div_ceil(state.draw_mode.count()) + 1;
    let max_taps = 2 * pass;
    debug!("No move on the board; cycling the stock up to {max_taps} taps");

    let mut scratch = state.clone();
    for tap in 1..=max_taps {
        let Some(next) = simulated_stock_tap(&scratch) else {
            break;
        };
        scratch = next;
        if best_hint_move(&scratch).is_some() {
            debug!("A move shows up after {tap} stock taps");
            return Some(Hint::TapStock);
        }
    }
    None
}
