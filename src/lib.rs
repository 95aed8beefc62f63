pub mod action;
pub mod advisor;
pub mod autofinish;
pub mod card;
pub mod deal;
pub mod evaluation;
pub mod hint;
pub mod moves;
pub mod rules;
pub mod scoring;
pub mod state;

pub use action::{Hint, PlannedMove};
pub use advisor::{best_advisable_destination, best_destination};
pub use autofinish::{auto_finish_plan, can_auto_finish, next_auto_finish_move};
pub use card::{Card, Suit};
pub use hint::{best_hint, best_hint_move};
pub use moves::{Destination, Selection, Source};
pub use state::{DrawMode, GameState, GameVariant};
