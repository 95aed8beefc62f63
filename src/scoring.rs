//! Point deltas for standard scoring and the time bonus awarded on a win.

use crate::action::PlannedMove;
use crate::moves::{Destination, Source};
use crate::state::{DrawMode, GameState};

use smallvec::SmallVec;

const TIME_BONUS_DRAW_ONE: u32 = 700;
const TIME_BONUS_DRAW_THREE: u32 = 1000;
const TIME_BONUS_LOSS_PER_SECOND: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringAction {
    WasteToTableau,
    WasteToFoundation,
    TableauToFoundation,
    RevealTableauCard,
    FoundationToTableau,
    RecycleWasteInDrawOne,
}

impl ScoringAction {
    pub const ALL: [ScoringAction; 6] = [
        ScoringAction::WasteToTableau,
        ScoringAction::WasteToFoundation,
        ScoringAction::TableauToFoundation,
        ScoringAction::RevealTableauCard,
        ScoringAction::FoundationToTableau,
        ScoringAction::RecycleWasteInDrawOne,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScoringAction::WasteToTableau => "Waste to tableau",
            ScoringAction::WasteToFoundation => "Waste to foundation",
            ScoringAction::TableauToFoundation => "Tableau to foundation",
            ScoringAction::RevealTableauCard => "Turn over a tableau card",
            ScoringAction::FoundationToTableau => "Foundation to tableau",
            ScoringAction::RecycleWasteInDrawOne => "Recycle waste (draw one)",
        }
    }
}

pub fn delta(action: ScoringAction) -> i32 {
    match action {
        ScoringAction::WasteToTableau => 5,
        ScoringAction::WasteToFoundation => 10,
        ScoringAction::TableauToFoundation => 10,
        ScoringAction::RevealTableauCard => 5,
        ScoringAction::FoundationToTableau => -15,
        ScoringAction::RecycleWasteInDrawOne => -100,
    }
}

/// `score` after `action`, floored at zero.
pub fn applying(action: ScoringAction, score: u32) -> u32 {
    score.saturating_add_signed(delta(action))
}

/// Bonus for winning after `elapsed_secs`; never negative.
pub fn time_bonus(elapsed_secs: u64, draw_mode: DrawMode) -> u32 {
    let max_bonus = match draw_mode {
        DrawMode::One => TIME_BONUS_DRAW_ONE,
        DrawMode::Three => TIME_BONUS_DRAW_THREE,
    };
    let loss = elapsed_secs.saturating_mul(TIME_BONUS_LOSS_PER_SECOND as u64);
    (max_bonus as u64).saturating_sub(loss) as u32
}

/// The scoring actions a committed move earns, judged on the board before it
/// is played. Free-cell moves score nothing.
pub fn actions_for_move(state: &GameState, mov: &PlannedMove) -> SmallVec<[ScoringAction; 2]> {
    let mut actions = SmallVec::new();
    match (mov.selection.source, mov.destination) {
        (Source::Waste, Destination::Tableau(_)) => actions.push(ScoringAction::WasteToTableau),
        (Source::Waste, Destination::Foundation(_)) => {
            actions.push(ScoringAction::WasteToFoundation)
        }
        (Source::Tableau { .. }, Destination::Foundation(_)) => {
            actions.push(ScoringAction::TableauToFoundation)
        }
        (Source::Foundation(_), Destination::Tableau(_)) => {
            actions.push(ScoringAction::FoundationToTableau)
        }
        _ => {}
    }
    if let Source::Tableau { pile, index } = mov.selection.source {
        let reveals = index > 0
            && state
                .tableau
                .get(pile)
                .and_then(|p| p.get(index - 1))
                .is_some_and(|card| !card.face_up);
        if reveals {
            actions.push(ScoringAction::RevealTableauCard);
        }
    }
    actions
}

/// The penalty for a stock tap, if any: only recycling under draw one costs.
pub fn recycle_action(state: &GameState) -> Option<ScoringAction> {
    let recycles = state.stock.is_empty() && !state.waste.is_empty();
    (recycles && state.draw_mode == DrawMode::One).then_some(ScoringAction::RecycleWasteInDrawOne)
}
