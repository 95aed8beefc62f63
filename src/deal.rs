//! Seeded deals. The advisory queries never shuffle; these only produce
//! starting positions for the command line and for tests.

use crate::card::{ACE, Card, KING, Suit};
use crate::state::{DrawMode, GameState, GameVariant};

/// Deal suit order shared by both shuffles: clubs, diamonds, hearts, spades.
const DEAL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

/// Klondike deal compatible with greenfelt.net game numbers.
pub fn klondike(seed: u32, draw_mode: DrawMode) -> GameState {
    let mut current_seed = seed;
    let mut rnd = || {
        current_seed = ((current_seed as u64 * 16807) % 0x7fffffff) as u32;
        current_seed
    };
    let mut deck: Vec<Card> = DEAL_SUITS
        .iter()
        .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::face_down(suit, rank)))
        .collect();

    for _ in 0..7 {
        for j in 0..52 {
            let k = (rnd() % 52) as usize;
            deck.swap(j, k);
        }
    }

    deck.rotate_left(24);

    let mut orig: i32 = 27;
    for i in 0..7_i32 {
        let mut pos = (i + 1) * (i + 2) / 2 - 1;
        for j in (0..=(6 - i)).rev() {
            if j >= i {
                deck.swap(pos as usize, orig as usize);
            }
            orig -= 1;
            pos += 6 - j + 1;
        }
    }

    let mut state = GameState::new(GameVariant::Klondike);
    state.draw_mode = draw_mode;

    let mut m = 0;
    for (idx, pile) in state.tableau.iter_mut().enumerate() {
        for _ in 0..=idx {
            pile.push(deck[m]);
            m += 1;
        }
        if let Some(top) = pile.last_mut() {
            top.face_up = true;
        }
    }

    state.stock.extend_from_slice(&deck[m..]);

    state
}

/// The classic numbered FreeCell deal.
pub fn freecell(seed: u32) -> GameState {
    let mut current_seed = seed;
    let mut rnd = || {
        current_seed = current_seed.wrapping_mul(214013).wrapping_add(2531011) & 0x7fffffff;
        (current_seed >> 16) as usize
    };
    let mut deck: Vec<Card> = (ACE..=KING)
        .flat_map(|rank| DEAL_SUITS.iter().map(move |&suit| Card::face_up(suit, rank)))
        .collect();

    let mut state = GameState::new(GameVariant::FreeCell);
    let tableau_count = state.tableau.len();
    for i in 0..deck.len() {
        let left = deck.len() - i;
        let k = rnd() % left;
        deck.swap(k, left - 1);
        state.tableau[i % tableau_count].push(deck[left - 1]);
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_klondike_deal() {
        let state = klondike(670334786, DrawMode::Three);
        assert!(state.is_valid());
        assert_eq!(state.draw_mode, DrawMode::Three);
        assert_eq!(state.stock.len(), 24);
        assert_eq!(state.tableau_card_count(), 28);
        assert_eq!(state.face_down_count(), 21);
        assert!(state.tableau.iter().all(|pile| pile.last().is_some_and(|c| c.face_up)));
        assert_eq!(state, klondike(670334786, DrawMode::Three));
    }

    #[test]
    fn test_freecell_deal() {
        let state = freecell(1);
        assert!(state.is_valid());
        let lens: Vec<usize> = state.tableau.iter().map(|pile| pile.len()).collect();
        assert_eq!(lens, vec![7, 7, 7, 7, 6, 6, 6, 6]);
        assert_eq!(state.face_down_count(), 0);
        // Deal #1: first column starts J♦ K♦, fourth column ends with 6♥.
        assert_eq!(state.tableau[0][0], Card::face_up(Suit::Diamonds, 11));
        assert_eq!(state.tableau[0][1], Card::face_up(Suit::Diamonds, 13));
        assert_eq!(state.tableau[3][6], Card::face_up(Suit::Hearts, 6));
        assert_ne!(state, freecell(2));
    }
}
