use anyhow::{Context, Result};

pub const ACE: u8 = 1;
pub const KING: u8 = 13;
pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    pub fn parse(c: char) -> Option<Self> {
        match c {
            '♠' | 'S' | 's' => Some(Suit::Spades),
            '♥' | 'H' | 'h' => Some(Suit::Hearts),
            '♦' | 'D' | 'd' => Some(Suit::Diamonds),
            '♣' | 'C' | 'c' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// A single playing card.
///
/// The id is derived from `(suit, rank)`, so it is stable for the lifetime of
/// a game and unique across a 52-card deck. `face_up` is only ever changed by
/// whoever commits moves; the query functions never flip a card in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    id: u8,
    suit: Suit,
    rank: u8,
    pub face_up: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: u8, face_up: bool) -> Self {
        debug_assert!((ACE..=KING).contains(&rank), "rank {rank} out of range");
        Self {
            id: suit.index() * MAX_RANK + (rank - 1),
            suit,
            rank,
            face_up,
        }
    }

    pub fn face_up(suit: Suit, rank: u8) -> Self {
        Self::new(suit, rank, true)
    }

    pub fn face_down(suit: Suit, rank: u8) -> Self {
        Self::new(suit, rank, false)
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn is_red(&self) -> bool {
        self.suit.is_red()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == ACE
    }

    pub fn is_king(&self) -> bool {
        self.rank == KING
    }

    pub fn turned_up(self) -> Self {
        Self {
            face_up: true,
            ..self
        }
    }

    pub fn turned_down(self) -> Self {
        Self {
            face_up: false,
            ..self
        }
    }

    pub fn parse(rank: char, suit: char) -> Result<Self> {
        let rank_idx = RANKS
            .iter()
            .position(|&r| r == rank.to_ascii_uppercase())
            .with_context(|| format!("Invalid rank at card {rank}{suit}"))?;
        let suit = Suit::parse(suit).with_context(|| format!("Invalid suit at card {rank}{suit}"))?;
        Ok(Card::face_up(suit, rank_idx as u8 + 1))
    }

    pub fn pretty_print(&self) -> String {
        format!("{}{}", RANKS[(self.rank - 1) as usize], self.suit.symbol())
    }
}

/// All 52 cards face down, suit by suit from Ace to King.
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::face_down(suit, rank)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_deck_is_unique() {
        let deck = full_deck();
        assert_eq!(deck.len(), MAX_CARD as usize);
        let mut seen = [false; MAX_CARD as usize];
        for card in &deck {
            assert!(!seen[card.id() as usize]);
            seen[card.id() as usize] = true;
        }
        assert!(deck.iter().all(|c| !c.face_up));
    }

    #[test]
    fn test_parse_card() {
        let card = Card::parse('T', '♥').unwrap();
        assert_eq!(card.rank(), 10);
        assert_eq!(card.suit(), Suit::Hearts);
        assert!(card.is_red());
        assert_eq!(card.pretty_print(), "T♥");

        let card = Card::parse('q', 'c').unwrap();
        assert_eq!(card, Card::face_up(Suit::Clubs, 12));

        assert!(Card::parse('X', '♠').is_err());
        assert!(Card::parse('5', 'X').is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_rank_zero_is_rejected() {
        Card::face_up(Suit::Spades, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_rank_above_king_is_rejected() {
        Card::face_down(Suit::Clubs, KING + 1);
    }

    #[test]
    fn test_colors() {
        assert!(!Suit::Spades.is_red());
        assert!(Suit::Hearts.is_red());
        assert!(Suit::Diamonds.is_red());
        assert!(!Suit::Clubs.is_red());
    }
}
