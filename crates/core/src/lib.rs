//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod bosses;
pub mod cards;
pub mod config;
pub mod content;
pub mod deck;
pub mod effects;
pub mod events;
pub mod inventory;
pub mod jokers;
pub mod moves;
pub mod rng;
pub mod round;
pub mod rules;
pub mod run;
pub mod save;
pub mod scoring;
pub mod shop;
pub mod state;

pub use bosses::*;
pub use cards::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use effects::*;
pub use events::*;
pub use inventory::*;
pub use jokers::*;
pub use moves::*;
pub use rng::*;
pub use round::*;
pub use rules::*;
pub use run::*;
pub use save::*;
pub use scoring::*;
pub use shop::*;
pub use state::*;
