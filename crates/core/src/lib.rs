//! Race simulation. Keep this crate free of IO and platform concerns; every
//! decision that needs a human goes through a `Presenter`.

pub mod cards;
pub mod checkpoint;
pub mod config;
pub mod deck;
pub mod events;
pub mod movement;
pub mod pacing;
pub mod pilot;
pub mod policy;
pub mod prompt;
pub mod race;
pub mod rng;
pub mod state;

pub use cards::*;
pub use checkpoint::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use movement::*;
pub use pacing::*;
pub use pilot::*;
pub use policy::*;
pub use prompt::*;
pub use race::*;
pub use rng::*;
pub use state::*;
