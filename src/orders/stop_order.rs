/// Stop (conditional) orders held locally until their trigger price trades
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::STOPORDER_PREFIX;
use crate::error::{Result, TradingError};
use crate::types::{Direction, Offset, StopOrderStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopOrder {
    /// Exchange-qualified symbol, e.g. "rb2010.SHFE"
    pub symbol: String,
    pub direction: Direction,
    pub offset: Offset,
    /// Trigger price
    pub price: f64,
    pub volume: f64,
    pub stop_order_id: String,
    pub strategy_name: String,
    /// Lock mode for the real order sent on trigger
    #[serde(default)]
    pub lock: bool,
    /// Real orders sent once triggered
    #[serde(default)]
    pub order_ids: Vec<String>,
    #[serde(default)]
    pub status: StopOrderStatus,
    #[serde(default)]
    pub gateway_name: Option<String>,
}

impl StopOrder {
    pub fn new(
        symbol: impl Into<String>,
        direction: Direction,
        offset: Offset,
        price: f64,
        volume: f64,
        stop_order_id: impl Into<String>,
        strategy_name: impl Into<String>,
    ) -> Self {
        StopOrder {
            symbol: symbol.into(),
            direction,
            offset,
            price,
            volume,
            stop_order_id: stop_order_id.into(),
            strategy_name: strategy_name.into(),
            lock: false,
            order_ids: Vec::new(),
            status: StopOrderStatus::Waiting,
            gateway_name: None,
        }
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_gateway(mut self, gateway_name: impl Into<String>) -> Self {
        self.gateway_name = Some(gateway_name.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == StopOrderStatus::Waiting
    }

    /// Long stops fire at or above the trigger price, short stops at or below
    pub fn should_trigger(&self, last_price: f64) -> bool {
        if !self.is_active() {
            return false;
        }

        match self.direction {
            Direction::Long => last_price >= self.price,
            Direction::Short => last_price <= self.price,
        }
    }

    /// Mark as triggered, recording the real orders sent in its place
    pub fn trigger(&mut self, order_ids: Vec<String>) -> Result<()> {
        self.ensure_active()?;

        debug!(
            "Stop order {} triggered at {} -> {:?}",
            self.stop_order_id, self.price, order_ids
        );
        self.order_ids = order_ids;
        self.status = StopOrderStatus::Triggered;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_active()?;

        debug!("Stop order {} cancelled", self.stop_order_id);
        self.status = StopOrderStatus::Cancelled;
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        if self.status.is_terminal() {
            warn!(
                "Rejected transition on stop order {} ({})",
                self.stop_order_id, self.status
            );
            return Err(TradingError::StopOrderFinalized {
                stop_order_id: self.stop_order_id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}

/// Issues "STOP.1", "STOP.2", ... ids
#[derive(Debug, Default)]
pub struct StopOrderIdGenerator {
    count: AtomicU64,
}

impl StopOrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}.{}", STOPORDER_PREFIX, count)
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Whether an order id refers to a local stop order rather than a gateway order
pub fn is_stop_order_id(order_id: &str) -> bool {
    order_id
        .strip_prefix(STOPORDER_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|count| !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()))
}
