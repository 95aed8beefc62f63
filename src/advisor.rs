//! Picks destinations for a selection: the best legal one, and the best one
//! worth recommending to a player.

use crate::evaluation::{MoveEvaluation, best_evaluation, evaluate_destinations};
use crate::moves::{
    Destination, Selection, Source, all_moves, candidate_selections, simulated_state,
};
use crate::state::GameState;

use log::{debug, trace};
use rustc_hash::FxHashSet;

/// The best-ranked legal destination, advisable or not.
pub fn best_destination(selection: &Selection, state: &GameState) -> Option<Destination> {
    best_evaluation(evaluate_destinations(selection, state)).map(|e| e.destination)
}

/// The best-ranked destination among those worth recommending.
pub fn best_advisable_destination(
    selection: &Selection,
    state: &GameState,
) -> Option<Destination> {
    best_advisable_evaluation(selection, state).map(|e| e.destination)
}

pub(crate) fn best_advisable_evaluation(
    selection: &Selection,
    state: &GameState,
) -> Option<MoveEvaluation> {
    let evaluations = evaluate_destinations(selection, state)
        .into_iter()
        .filter(|evaluation| is_advisable(selection, evaluation, state));
    best_evaluation(evaluations)
}

pub fn is_advisable(
    selection: &Selection,
    evaluation: &MoveEvaluation,
    state: &GameState,
) -> bool {
    let destination = evaluation.destination;
    let advisable = match selection.source {
        Source::Foundation(_) if matches!(destination, Destination::Foundation(_)) => false,
        _ if evaluation.has_forward_gain() => true,
        Source::Waste => true,
        Source::FreeCell(_) => evaluation.mobility_delta >= 0,
        Source::Tableau { .. } => match destination {
            Destination::Tableau(_) => evaluation.mobility_delta > 1,
            _ => evaluation.mobility_delta > 0,
        },
        Source::Foundation(_) => rollback_unlocks_progress(selection, destination, state),
    };
    trace!(
        "{:?} -> {destination:?} advisable={advisable} ({evaluation:?})",
        selection.source
    );
    advisable
}

/// A card taken back off a foundation is only worth it when, one ply later,
/// some move appears that was not available before, makes forward progress,
/// and is not that same card going straight back up.
fn rollback_unlocks_progress(
    selection: &Selection,
    destination: Destination,
    state: &GameState,
) -> bool {
    let Some(card) = selection.lead() else {
        return false;
    };
    let Some(after) = simulated_state(state, selection, destination) else {
        return false;
    };

    let before: FxHashSet<(u8, Destination)> = all_moves(state)
        .iter()
        .filter_map(|(sel, dest)| sel.lead().map(|lead| (lead.id(), *dest)))
        .collect();

    for follow_up in candidate_selections(&after) {
        let Some(lead) = follow_up.lead() else {
            continue;
        };
        for evaluation in evaluate_destinations(&follow_up, &after) {
            if before.contains(&(lead.id(), evaluation.destination)) {
                continue;
            }
            let straight_back = matches!(evaluation.destination, Destination::Foundation(_));
            if lead.id() == card.id() && straight_back {
                continue;
            }
            if evaluation.has_forward_gain() {
                debug!(
                    "Rollback of {} to {destination:?} unlocks {} -> {:?}",
                    card.pretty_print(),
                    lead.pretty_print(),
                    evaluation.destination
                );
                return true;
            }
        }
    }

    debug!(
        "Rollback of {} to {destination:?} unlocks nothing",
        card.pretty_print()
    );
    false
}
