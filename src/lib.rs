pub mod ability;
pub mod client;
pub mod codes;
pub mod config;
pub mod crawl;
pub mod decode;
pub mod dom;
pub mod error;
pub mod moves;
pub mod output;
pub mod pokemon;

pub use ability::Ability;
pub use client::SiteClient;
pub use config::*;
pub use crawl::Crawler;
pub use error::{Result, ScrapeError};
pub use moves::Move;
pub use pokemon::{AbilitySlots, BaseStats, Pokemon};
