//! Scoring of hypothetical moves and the total order used to rank them.

use crate::moves::{
    Destination, Selection, Source, candidate_selections, legal_destinations, simulated_state,
};
use crate::state::GameState;

use std::cmp::Ordering;

/// Sum over every candidate selection of its legal destination count.
pub fn mobility_score(state: &GameState) -> usize {
    candidate_selections(state)
        .iter()
        .map(|selection| legal_destinations(selection, state).len())
        .sum()
}

/// Signals derived from simulating one move against a baseline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvaluation {
    pub destination: Destination,
    pub reveals_card: bool,
    pub clears_source: bool,
    pub empty_tableau_delta: i32,
    pub foundation_delta: i32,
    pub mobility_delta: i32,
    pub resulting_mobility: usize,
    pub destination_priority: u8,
}

impl MoveEvaluation {
    /// Reveals a card, grows the foundations or opens a pile.
    pub fn has_forward_gain(&self) -> bool {
        self.reveals_card || self.foundation_delta > 0 || self.empty_tableau_delta > 0
    }
}

impl Ord for MoveEvaluation {
    /// Greater is better. The destination comparison is reversed so that the
    /// lowest destination wins a full tie.
    fn cmp(&self, other: &Self) -> Ordering {
        self.reveals_card
            .cmp(&other.reveals_card)
            .then(self.foundation_delta.cmp(&other.foundation_delta))
            .then(self.mobility_delta.cmp(&other.mobility_delta))
            .then(self.empty_tableau_delta.cmp(&other.empty_tableau_delta))
            .then(self.clears_source.cmp(&other.clears_source))
            .then(self.destination_priority.cmp(&other.destination_priority))
            .then(self.resulting_mobility.cmp(&other.resulting_mobility))
            .then(other.destination.cmp(&self.destination))
    }
}

impl PartialOrd for MoveEvaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn destination_priority(destination: Destination, state: &GameState) -> u8 {
    match destination {
        Destination::Tableau(idx) if state.tableau[idx].is_empty() => 3,
        Destination::Foundation(_) => 2,
        Destination::Tableau(_) => 1,
        Destination::FreeCell(_) => 0,
    }
}

fn reveals_card(selection: &Selection, state: &GameState) -> bool {
    match selection.source {
        Source::Tableau { pile, index } if index > 0 => state
            .tableau
            .get(pile)
            .and_then(|p| p.get(index - 1))
            .is_some_and(|card| !card.face_up),
        _ => false,
    }
}

fn clears_source(selection: &Selection, state: &GameState) -> bool {
    match selection.source {
        Source::Tableau { index, .. } => index == 0,
        Source::Waste => state.waste.len() == 1,
        Source::Foundation(idx) => state.foundations[idx].len() == 1,
        Source::FreeCell(_) => false,
    }
}

/// Evaluates one move, given the baseline's precomputed mobility.
pub fn evaluate(
    selection: &Selection,
    destination: Destination,
    state: &GameState,
    baseline_mobility: usize,
) -> Option<MoveEvaluation> {
    let next = simulated_state(state, selection, destination)?;
    let resulting_mobility = mobility_score(&next);
    Some(MoveEvaluation {
        destination,
        reveals_card: reveals_card(selection, state),
        clears_source: clears_source(selection, state),
        empty_tableau_delta: next.empty_tableau_count() as i32
            - state.empty_tableau_count() as i32,
        foundation_delta: next.foundation_card_count() as i32
            - state.foundation_card_count() as i32,
        mobility_delta: resulting_mobility as i32 - baseline_mobility as i32,
        resulting_mobility,
        destination_priority: destination_priority(destination, state),
    })
}

/// Evaluations of every legal destination of `selection`, in destination order.
pub fn evaluate_destinations(selection: &Selection, state: &GameState) -> Vec<MoveEvaluation> {
    let destinations = legal_destinations(selection, state);
    if destinations.is_empty() {
        return vec![];
    }
    let baseline_mobility = mobility_score(state);
    destinations
        .into_iter()
        .filter_map(|destination| evaluate(selection, destination, state, baseline_mobility))
        .collect()
}

pub fn best_evaluation(
    evaluations: impl IntoIterator<Item = MoveEvaluation>,
) -> Option<MoveEvaluation> {
    evaluations.into_iter().max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Suit};

    fn neutral(destination: Destination) -> MoveEvaluation {
        MoveEvaluation {
            destination,
            reveals_card: false,
            clears_source: false,
            empty_tableau_delta: 0,
            foundation_delta: 0,
            mobility_delta: 0,
            resulting_mobility: 10,
            destination_priority: 1,
        }
    }

    #[test]
    fn test_reveal_outranks_everything() {
        let reveal = MoveEvaluation {
            reveals_card: true,
            foundation_delta: -1,
            mobility_delta: -5,
            empty_tableau_delta: -1,
            resulting_mobility: 0,
            destination_priority: 0,
            ..neutral(Destination::FreeCell(3))
        };
        let strong = MoveEvaluation {
            foundation_delta: 1,
            mobility_delta: 9,
            empty_tableau_delta: 1,
            clears_source: true,
            resulting_mobility: 40,
            destination_priority: 3,
            ..neutral(Destination::Foundation(0))
        };
        assert!(reveal > strong);
    }

    #[test]
    fn test_foundation_gain_outranks_mobility() {
        let foundation = MoveEvaluation {
            foundation_delta: 1,
            mobility_delta: -3,
            ..neutral(Destination::Foundation(2))
        };
        let mobile = MoveEvaluation {
            mobility_delta: 6,
            empty_tableau_delta: 1,
            ..neutral(Destination::Tableau(0))
        };
        assert!(foundation > mobile);

        let rollback = MoveEvaluation {
            foundation_delta: -1,
            mobility_delta: 8,
            ..neutral(Destination::Tableau(0))
        };
        assert!(mobile > rollback);
    }

    #[test]
    fn test_destination_tiebreak() {
        let a = neutral(Destination::Foundation(3));
        let b = neutral(Destination::Tableau(0));
        let c = neutral(Destination::Tableau(4));
        let d = neutral(Destination::FreeCell(0));
        assert_eq!(best_evaluation([d, c, b, a]), Some(a));
        assert_eq!(best_evaluation([d, c, b]), Some(b));
        assert_eq!(best_evaluation([d, c]), Some(c));
    }

    #[test]
    fn test_evaluate_signals() {
        const BOARD_STR: &str = r#"Foundation1: 7♥
Tableau1: Q♣|8♥
Tableau2: |9♠
Tableau3: |8♦"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        let selection = Selection::new(
            Source::Tableau { pile: 0, index: 1 },
            &[Card::face_up(Suit::Hearts, 8)],
        );
        let evaluations = evaluate_destinations(&selection, &state);
        assert_eq!(evaluations.len(), 2);

        let foundation = evaluations[0];
        assert_eq!(foundation.destination, Destination::Foundation(0));
        assert!(foundation.reveals_card);
        assert!(!foundation.clears_source);
        assert_eq!(foundation.foundation_delta, 1);
        assert_eq!(foundation.empty_tableau_delta, 0);
        assert_eq!(foundation.destination_priority, 2);

        let tableau = evaluations[1];
        assert_eq!(tableau.destination, Destination::Tableau(1));
        assert_eq!(tableau.foundation_delta, 0);
        assert_eq!(tableau.destination_priority, 1);

        assert_eq!(best_evaluation(evaluations), Some(foundation));
    }

    #[test]
    fn test_mobility_score() {
        const BOARD_STR: &str = r#"Waste: 8♦
Tableau1: |9♠
Tableau2: |9♣"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        // 8♦ can go on either nine; the nines have nowhere to go.
        assert_eq!(mobility_score(&state), 2);
        assert_eq!(mobility_score(&GameState::default()), 0);
    }
}
