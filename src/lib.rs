pub mod constants;
pub mod types;
pub mod error;
pub mod events;
pub mod market;
pub mod orders;
pub mod config;
pub mod time;

pub use constants::*;
pub use types::*;
pub use error::{Result, TradingError};
