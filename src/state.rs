use crate::card::{Card, MAX_CARD};

use anyhow::{Context, Result, bail};
use smallvec::SmallVec;

pub const TOTAL_FOUNDATIONS: usize = 4;
pub const TOTAL_FREE_CELLS: usize = 4;
pub const TALON_SIZE: usize = 24;
const PILE_SIZE: usize = 20;

pub type Pile = SmallVec<[Card; PILE_SIZE]>;
pub type Talon = SmallVec<[Card; TALON_SIZE]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameVariant {
    #[default]
    Klondike,
    FreeCell,
}

impl GameVariant {
    pub fn tableau_count(self) -> usize {
        match self {
            GameVariant::Klondike => 7,
            GameVariant::FreeCell => 8,
        }
    }

    pub fn has_free_cells(self) -> bool {
        matches!(self, GameVariant::FreeCell)
    }

    pub fn has_stock(self) -> bool {
        matches!(self, GameVariant::Klondike)
    }

    pub fn id(self) -> &'static str {
        match self {
            GameVariant::Klondike => "klondike",
            GameVariant::FreeCell => "freecell",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "klondike" => Some(GameVariant::Klondike),
            "freecell" => Some(GameVariant::FreeCell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    #[default]
    One,
    Three,
}

impl DrawMode {
    pub fn count(self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(DrawMode::One),
            3 => Some(DrawMode::Three),
            _ => None,
        }
    }
}

/// A complete board snapshot.
///
/// Stock and waste are stored bottom to top, so `last()` is the card a tap
/// would deal or the card a player can pick up. Foundations are not bound to a
/// suit; the rules only look at each foundation's top card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub variant: GameVariant,
    pub draw_mode: DrawMode,
    pub stock: Talon,
    pub waste: Talon,
    pub free_cells: [Option<Card>; TOTAL_FREE_CELLS],
    pub foundations: [Pile; TOTAL_FOUNDATIONS],
    pub tableau: SmallVec<[Pile; 8]>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameVariant::Klondike)
    }
}

impl GameState {
    pub fn new(variant: GameVariant) -> Self {
        Self {
            variant,
            draw_mode: DrawMode::One,
            stock: Talon::new(),
            waste: Talon::new(),
            free_cells: [None; TOTAL_FREE_CELLS],
            foundations: Default::default(),
            tableau: (0..variant.tableau_count()).map(|_| Pile::new()).collect(),
        }
    }

    pub fn foundation_card_count(&self) -> usize {
        self.foundations.iter().map(|pile| pile.len()).sum()
    }

    pub fn empty_tableau_count(&self) -> usize {
        self.tableau.iter().filter(|pile| pile.is_empty()).count()
    }

    pub fn empty_free_cell_count(&self) -> usize {
        self.free_cells.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn face_down_count(&self) -> usize {
        self.tableau
            .iter()
            .flat_map(|pile| pile.iter())
            .filter(|card| !card.face_up)
            .count()
    }

    pub fn tableau_card_count(&self) -> usize {
        self.tableau.iter().map(|pile| pile.len()).sum()
    }

    pub fn is_won(&self) -> bool {
        self.foundation_card_count() == MAX_CARD as usize
    }

    /// Every card of the deck appears exactly once across all zones and every
    /// foundation is suit-pure and ascending from Ace.
    pub fn is_valid(&self) -> bool {
        if self.tableau.len() != self.variant.tableau_count() {
            return false;
        }

        let mut seen = [false; MAX_CARD as usize];
        let mut count = 0;
        let mut check_cards = |cards: &[Card]| -> bool {
            for card in cards {
                let id = card.id() as usize;
                if seen[id] {
                    return false;
                }
                seen[id] = true;
                count += 1;
            }
            true
        };

        if !check_cards(&self.stock) || !check_cards(&self.waste) {
            return false;
        }
        for card in self.free_cells.iter().flatten() {
            if !check_cards(std::slice::from_ref(card)) {
                return false;
            }
        }
        for pile in &self.foundations {
            let ordered = pile.iter().enumerate().all(|(i, card)| {
                card.rank() as usize == i + 1 && card.suit() == pile[0].suit()
            });
            if !ordered || !check_cards(pile) {
                return false;
            }
        }
        for pile in &self.tableau {
            if !check_cards(pile) {
                return false;
            }
        }
        count == MAX_CARD as usize
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut state = GameState::default();
        let mut tableau_lines: Vec<(usize, Pile)> = vec![];

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            if let Some(rest) = line.strip_prefix("Variant:") {
                state.variant = GameVariant::from_id(rest.trim())
                    .context("Invalid variant")
                    .with_context(line_context)?;
            } else if let Some(rest) = line.strip_prefix("Stock:") {
                let cards = parse_cards(rest.trim()).with_context(line_context)?;
                state.stock = cards.into_iter().map(Card::turned_down).collect();
            } else if let Some(rest) = line.strip_prefix("Waste:") {
                state.waste = parse_cards(rest.trim())
                    .with_context(line_context)?
                    .into_iter()
                    .collect();
            } else if let Some(rest) = line.strip_prefix("FreeCell") {
                let (idx, rest) = parse_indexed(rest, TOTAL_FREE_CELLS)
                    .context("Invalid free cell index")
                    .with_context(line_context)?;
                let cards = parse_cards(rest).with_context(line_context)?;
                if cards.len() > 1 {
                    bail!("A free cell holds at most one card at '{line}'");
                }
                state.free_cells[idx] = cards.first().copied();
            } else if let Some(rest) = line.strip_prefix("Foundation") {
                let (idx, rest) = parse_indexed(rest, TOTAL_FOUNDATIONS)
                    .context("Invalid foundation index")
                    .with_context(line_context)?;
                let cards = parse_cards(rest).with_context(line_context)?;
                // A lone card stands for the whole run from the Ace.
                state.foundations[idx] = match cards.as_slice() {
                    [top] => (1..=top.rank())
                        .map(|rank| Card::face_up(top.suit(), rank))
                        .collect(),
                    _ => cards.into_iter().collect(),
                };
            } else if let Some(rest) = line.strip_prefix("Tableau") {
                let (idx, cards_str) = parse_indexed(rest, usize::MAX)
                    .context("Invalid tableau index")
                    .with_context(line_context)?;
                let (before, after) = match cards_str.find('|') {
                    Some(idx) => {
                        let (b, a) = cards_str.split_at(idx);
                        (b, &a[1..])
                    }
                    None => (cards_str, ""),
                };
                let face_down = parse_cards(before.trim()).with_context(line_context)?;
                let face_up = parse_cards(after.trim()).with_context(line_context)?;
                let pile = face_down
                    .into_iter()
                    .map(Card::turned_down)
                    .chain(face_up)
                    .collect();
                tableau_lines.push((idx, pile));
            } else if let Some(rest) = line.strip_prefix("DrawCount:") {
                let value = rest
                    .trim()
                    .parse::<usize>()
                    .context("Invalid DrawCount")
                    .with_context(line_context)?;
                state.draw_mode = DrawMode::from_count(value)
                    .context("DrawCount must be 1 or 3")
                    .with_context(line_context)?;
            }
        }

        if !state.variant.has_free_cells() && state.free_cells.iter().any(Option::is_some) {
            bail!("{} has no free cells", state.variant.id());
        }

        let tableau_count = state.variant.tableau_count();
        state.tableau = (0..tableau_count).map(|_| Pile::new()).collect();
        for (idx, pile) in tableau_lines {
            if idx >= tableau_count {
                bail!(
                    "Tableau{} is out of range for {}",
                    idx + 1,
                    state.variant.id()
                );
            }
            state.tableau[idx] = pile;
        }

        Ok(state)
    }

    pub fn pretty_print(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Variant: {}\n", self.variant.id()));

        if !self.stock.is_empty() {
            output.push_str("Stock: ");
            for card in &self.stock {
                output.push_str(&card.pretty_print());
            }
            output.push('\n');
        }

        if !self.waste.is_empty() {
            output.push_str("Waste: ");
            for card in &self.waste {
                output.push_str(&card.pretty_print());
            }
            output.push('\n');
        }

        for (i, slot) in self.free_cells.iter().enumerate() {
            if let Some(card) = slot {
                output.push_str(&format!("FreeCell{}: {}\n", i + 1, card.pretty_print()));
            }
        }

        for (i, pile) in self.foundations.iter().enumerate() {
            if let Some(card) = pile.last() {
                output.push_str(&format!("Foundation{}: {}\n", i + 1, card.pretty_print()));
            }
        }

        for (i, pile) in self.tableau.iter().enumerate() {
            if pile.is_empty() {
                continue;
            }
            output.push_str(&format!("Tableau{}: ", i + 1));
            let face_down = pile.iter().take_while(|card| !card.face_up).count();
            for (j, card) in pile.iter().enumerate() {
                if j == face_down {
                    output.push('|');
                }
                output.push_str(&card.pretty_print());
            }
            output.push('\n');
        }

        output.push_str(&format!("DrawCount: {}", self.draw_mode.count()));

        output
    }
}

fn parse_indexed(rest: &str, limit: usize) -> Result<(usize, &str)> {
    let mut parts = rest.splitn(2, ':');
    let idx = parts.next().unwrap_or("").trim().parse::<usize>()?;
    if idx == 0 || idx > limit {
        bail!("Index {idx} is out of range");
    }
    Ok((idx - 1, parts.next().unwrap_or("").trim()))
}

fn parse_cards(s: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c1) = chars.peek() {
        if c1.is_whitespace() || c1 == '|' {
            chars.next();
            continue;
        }
        let rank = c1;
        chars.next();
        let suit = match chars.next() {
            Some(s) => s,
            None => bail!("Missing suit after '{rank}'"),
        };
        cards.push(Card::parse(rank, suit)?);
    }
    Ok(cards)
}
