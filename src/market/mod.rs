pub mod symbol;
pub mod tables;

pub use symbol::{round_to_tick, underlying_symbol};
pub use tables::{merge_tables, MarketTables, TickTable};
