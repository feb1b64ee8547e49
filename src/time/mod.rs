pub mod interval;
pub mod session;

pub use interval::{interval_delta, interval_delta_map};
pub use session::{MarketSession, SessionWindow};
