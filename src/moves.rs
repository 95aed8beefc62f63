use crate::card::Card;
use crate::rules::{
    can_move_to_foundation, can_move_to_free_cell, can_move_to_tableau,
    is_valid_descending_alternating_sequence, max_free_cell_transfer_count,
};
use crate::state::{GameState, GameVariant};

use smallvec::SmallVec;

pub type Run = SmallVec<[Card; 13]>;
pub type Destinations = SmallVec<[Destination; 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Waste,
    Foundation(usize),
    FreeCell(usize),
    Tableau { pile: usize, index: usize },
}

/// Where a selection can land.
///
/// The derived order is the final tiebreak of move ranking: foundations
/// before tableau piles before free cells, then by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Destination {
    Foundation(usize),
    Tableau(usize),
    FreeCell(usize),
}

/// Cards picked up from one source. Tableau runs are the pile's suffix from
/// `index`; every other source carries exactly one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source: Source,
    pub cards: Run,
}

impl Selection {
    pub fn new(source: Source, cards: &[Card]) -> Self {
        Self {
            source,
            cards: cards.iter().copied().collect(),
        }
    }

    pub fn lead(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn is_single(&self) -> bool {
        self.cards.len() == 1
    }

    /// The selection still describes the live top of its source.
    pub fn is_current(&self, state: &GameState) -> bool {
        let single = |top: Option<&Card>| self.is_single() && top == self.cards.first();
        match self.source {
            Source::Waste => single(state.waste.last()),
            Source::Foundation(idx) => single(state.foundations.get(idx).and_then(|p| p.last())),
            Source::FreeCell(idx) => single(state.free_cells.get(idx).and_then(|c| c.as_ref())),
            Source::Tableau { pile, index } => {
                !self.cards.is_empty()
                    && state
                        .tableau
                        .get(pile)
                        .and_then(|p| p.get(index..))
                        .is_some_and(|run| run == self.cards.as_slice())
            }
        }
    }

    fn can_be_carried(&self) -> bool {
        match self.source {
            Source::Tableau { .. } => {
                self.cards.iter().all(|card| card.face_up)
                    && is_valid_descending_alternating_sequence(&self.cards)
            }
            _ => true,
        }
    }
}

/// Every pick-up-able unit, in a stable order: waste, free cells,
/// foundations, then tableau piles left to right (shallowest run first).
pub fn candidate_selections(state: &GameState) -> Vec<Selection> {
    let mut selections = vec![];

    if let Some(card) = state.waste.last() {
        selections.push(Selection::new(Source::Waste, std::slice::from_ref(card)));
    }

    for (idx, slot) in state.free_cells.iter().enumerate() {
        if let Some(card) = slot {
            selections.push(Selection::new(Source::FreeCell(idx), std::slice::from_ref(card)));
        }
    }

    for (idx, pile) in state.foundations.iter().enumerate() {
        if let Some(card) = pile.last() {
            selections.push(Selection::new(Source::Foundation(idx), std::slice::from_ref(card)));
        }
    }

    for (pile_idx, pile) in state.tableau.iter().enumerate() {
        let first_face_up = pile.iter().position(|card| card.face_up).unwrap_or(pile.len());
        for index in first_face_up..pile.len() {
            let run = &pile[index..];
            if run.iter().all(|card| card.face_up) && is_valid_descending_alternating_sequence(run)
            {
                selections.push(Selection::new(
                    Source::Tableau {
                        pile: pile_idx,
                        index,
                    },
                    run,
                ));
            }
        }
    }

    selections
}

/// All destinations the selection may legally land on right now, in
/// destination order. A stale selection has none.
pub fn legal_destinations(selection: &Selection, state: &GameState) -> Destinations {
    let mut destinations = Destinations::new();
    if !selection.is_current(state) || !selection.can_be_carried() {
        return destinations;
    }
    let Some(lead) = selection.lead() else {
        return destinations;
    };

    if selection.is_single() {
        for (idx, pile) in state.foundations.iter().enumerate() {
            if selection.source != Source::Foundation(idx) && can_move_to_foundation(lead, pile) {
                destinations.push(Destination::Foundation(idx));
            }
        }
    }

    for (idx, pile) in state.tableau.iter().enumerate() {
        if let Source::Tableau { pile: src, index } = selection.source {
            if src == idx {
                continue;
            }
            // Carrying a whole pile into another empty pile changes nothing.
            if index == 0 && pile.is_empty() {
                continue;
            }
        }
        if !can_move_to_tableau(lead, pile, state.variant) {
            continue;
        }
        if state.variant == GameVariant::FreeCell
            && selection.cards.len() > 1
            && selection.cards.len()
                > max_free_cell_transfer_count(&state.free_cells, &state.tableau, Some(idx))
        {
            continue;
        }
        destinations.push(Destination::Tableau(idx));
    }

    if state.variant.has_free_cells()
        && selection.is_single()
        && !matches!(selection.source, Source::FreeCell(_))
    {
        for (idx, slot) in state.free_cells.iter().enumerate() {
            if can_move_to_free_cell(slot.as_ref()) {
                destinations.push(Destination::FreeCell(idx));
            }
        }
    }

    destinations
}

pub fn is_legal(selection: &Selection, destination: Destination, state: &GameState) -> bool {
    legal_destinations(selection, state).contains(&destination)
}

/// The state after moving `selection` to `destination`, or `None` when the
/// move is stale or illegal. The input state is left untouched.
pub fn simulated_state(
    state: &GameState,
    selection: &Selection,
    destination: Destination,
) -> Option<GameState> {
    if !is_legal(selection, destination, state) {
        return None;
    }

    let mut next = state.clone();
    match selection.source {
        Source::Waste => {
            next.waste.pop();
        }
        Source::Foundation(idx) => {
            next.foundations[idx].pop();
        }
        Source::FreeCell(idx) => {
            next.free_cells[idx] = None;
        }
        Source::Tableau { pile, index } => {
            let pile = &mut next.tableau[pile];
            pile.truncate(index);
            if let Some(top) = pile.last_mut() {
                top.face_up = true;
            }
        }
    }

    let mut cards = selection.cards.iter().map(|card| card.turned_up());
    match destination {
        Destination::Foundation(idx) => next.foundations[idx].extend(cards),
        Destination::Tableau(idx) => next.tableau[idx].extend(cards),
        Destination::FreeCell(idx) => next.free_cells[idx] = cards.next(),
    }

    Some(next)
}

/// The state after one tap on the stock: deal up to the draw count onto the
/// waste, or turn the waste back over when the stock is empty. `None` when
/// there is nothing to tap.
pub fn simulated_stock_tap(state: &GameState) -> Option<GameState> {
    if !state.variant.has_stock() {
        return None;
    }
    let mut next = state.clone();
    if next.stock.is_empty() {
        if next.waste.is_empty() {
            return None;
        }
        let recycled = next.waste.drain(..).rev().map(Card::turned_down);
        next.stock.extend(recycled);
    } else {
        let num = state.draw_mode.count().min(next.stock.len());
        let start = next.stock.len() - num;
        let drawn = next.stock.drain(start..).rev().map(Card::turned_up);
        next.waste.extend(drawn);
    }
    Some(next)
}

/// Every `(selection, destination)` pair currently legal, in enumeration order.
pub fn all_moves(state: &GameState) -> Vec<(Selection, Destination)> {
    candidate_selections(state)
        .into_iter()
        .flat_map(|selection| {
            legal_destinations(&selection, state)
                .into_iter()
                .map(move |destination| (selection.clone(), destination))
        })
        .collect()
}
