use crate::moves::{Destination, Selection, Source};
use crate::state::GameState;

/// A concrete move: what to pick up and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub selection: Selection,
    pub destination: Destination,
}

impl PlannedMove {
    pub fn new(selection: Selection, destination: Destination) -> Self {
        Self {
            selection,
            destination,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    Move(PlannedMove),
    /// Drawing or recycling the stock will eventually expose a worthwhile move.
    TapStock,
}

fn source_label(source: Source) -> String {
    match source {
        Source::Waste => "Waste".to_string(),
        Source::Foundation(idx) => format!("Foundation{}", idx + 1),
        Source::FreeCell(idx) => format!("FreeCell{}", idx + 1),
        Source::Tableau { pile, .. } => format!("Tableau{}", pile + 1),
    }
}

fn destination_label(destination: Destination) -> String {
    match destination {
        Destination::Foundation(idx) => format!("Foundation{}", idx + 1),
        Destination::Tableau(idx) => format!("Tableau{}", idx + 1),
        Destination::FreeCell(idx) => format!("FreeCell{}", idx + 1),
    }
}

/// Compact code for a move, e.g. `W:T3`, `T1:F2`, `T4:T6@3`.
pub fn move_code(mov: &PlannedMove) -> String {
    let from = match mov.selection.source {
        Source::Waste => "W".to_string(),
        Source::Foundation(idx) => format!("F{}", idx + 1),
        Source::FreeCell(idx) => format!("C{}", idx + 1),
        Source::Tableau { pile, .. } => format!("T{}", pile + 1),
    };
    let to = match mov.destination {
        Destination::Foundation(idx) => format!("F{}", idx + 1),
        Destination::Tableau(idx) => format!("T{}", idx + 1),
        Destination::FreeCell(idx) => format!("C{}", idx + 1),
    };
    let count = mov.selection.cards.len();
    if count > 1 {
        format!("{from}:{to}@{count}")
    } else {
        format!("{from}:{to}")
    }
}

pub fn format_moves(moves: &[PlannedMove]) -> String {
    let list: Vec<String> = moves.iter().map(move_code).collect();

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

/// Describes `mov` against the board it will be played on.
pub fn describe_move(state: &GameState, mov: &PlannedMove) -> String {
    let from_cards: String = mov
        .selection
        .cards
        .iter()
        .map(|card| card.pretty_print())
        .collect();
    let to_card = match mov.destination {
        Destination::Foundation(idx) => state.foundations.get(idx).and_then(|p| p.last()),
        Destination::Tableau(idx) => state.tableau.get(idx).and_then(|p| p.last()),
        Destination::FreeCell(_) => None,
    }
    .map(|card| card.pretty_print())
    .unwrap_or_default();
    format!(
        "({}) {from_cards} -> ({}) {to_card}",
        source_label(mov.selection.source),
        destination_label(mov.destination)
    )
    .trim_end()
    .to_string()
}

pub fn describe_hint(state: &GameState, hint: &Hint) -> String {
    match hint {
        Hint::Move(mov) => describe_move(state, mov),
        Hint::TapStock => {
            if state.stock.is_empty() {
                "Recycle the waste".to_string()
            } else {
                "Draw from the stock".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_and_format() {
        const BOARD_STR: &str = r#"Waste: 6♥
Tableau1: |7♠
Tableau2: 2♣|9♦8♣"#;

        let state = GameState::parse(BOARD_STR).unwrap();
        let waste = PlannedMove::new(
            Selection::new(Source::Waste, &state.waste),
            Destination::Tableau(0),
        );
        let run = PlannedMove::new(
            Selection::new(Source::Tableau { pile: 1, index: 1 }, &state.tableau[1][1..]),
            Destination::Tableau(3),
        );
        assert_eq!(describe_move(&state, &waste), "(Waste) 6♥ -> (Tableau1) 7♠");
        assert_eq!(describe_move(&state, &run), "(Tableau2) 9♦8♣ -> (Tableau4)");
        assert_eq!(move_code(&run), "T2:T4@2");
        assert_eq!(format_moves(&[waste, run]), "W:T1    T2:T4@2 \n");
        assert_eq!(describe_hint(&state, &Hint::TapStock), "Recycle the waste");
    }
}
