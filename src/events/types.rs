/// CTA events published on the framework's event bus
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{EVENT_CTA_LOG, EVENT_CTA_STOPORDER, EVENT_CTA_STRATEGY};
use crate::error::{Result, TradingError};
use crate::orders::StopOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaEvent {
    pub event_type: CtaEventType,
    pub timestamp: DateTime<Utc>,
    pub timestamp_ms: i64,
    pub idempotency_key: String,
    pub payload: CtaEventPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CtaEventType {
    Log,
    Strategy,
    StopOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CtaEventPayload {
    Log {
        msg: String,
        strategy_name: Option<String>,
    },
    Strategy {
        strategy_name: String,
        data: serde_json::Value,
    },
    StopOrder(StopOrder),
}

impl CtaEventType {
    pub const ALL: [CtaEventType; 3] = [
        CtaEventType::Log,
        CtaEventType::Strategy,
        CtaEventType::StopOrder,
    ];

    /// Topic name on the event bus
    pub fn as_str(&self) -> &'static str {
        match self {
            CtaEventType::Log => EVENT_CTA_LOG,
            CtaEventType::Strategy => EVENT_CTA_STRATEGY,
            CtaEventType::StopOrder => EVENT_CTA_STOPORDER,
        }
    }
}

// Topic names are matched exactly
impl FromStr for CtaEventType {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        CtaEventType::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| TradingError::unknown_variant("event topic", s))
    }
}

impl TryFrom<String> for CtaEventType {
    type Error = TradingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CtaEventType> for String {
    fn from(event_type: CtaEventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl fmt::Display for CtaEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CtaEventPayload {
    pub fn event_type(&self) -> CtaEventType {
        match self {
            CtaEventPayload::Log { .. } => CtaEventType::Log,
            CtaEventPayload::Strategy { .. } => CtaEventType::Strategy,
            CtaEventPayload::StopOrder(_) => CtaEventType::StopOrder,
        }
    }
}

impl CtaEvent {
    pub fn new(payload: CtaEventPayload) -> Self {
        let now = Utc::now();
        let event_type = payload.event_type();
        let idempotency_key = format!(
            "{}:{}:{}",
            event_type.as_str(),
            now.timestamp_millis(),
            uuid::Uuid::new_v4()
        );

        CtaEvent {
            event_type,
            timestamp: now,
            timestamp_ms: now.timestamp_millis(),
            idempotency_key,
            payload,
        }
    }

    pub fn log(msg: impl Into<String>, strategy_name: Option<&str>) -> Self {
        CtaEvent::new(CtaEventPayload::Log {
            msg: msg.into(),
            strategy_name: strategy_name.map(str::to_string),
        })
    }

    pub fn strategy(strategy_name: impl Into<String>, data: serde_json::Value) -> Self {
        CtaEvent::new(CtaEventPayload::Strategy {
            strategy_name: strategy_name.into(),
            data,
        })
    }

    /// Snapshot of a stop order's current state
    pub fn stop_order(order: &StopOrder) -> Self {
        CtaEvent::new(CtaEventPayload::StopOrder(order.clone()))
    }

    pub fn topic(&self) -> &'static str {
        self.event_type.as_str()
    }

    /// Single-line JSON, as written to event logs
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Offset};

    #[test]
    fn test_topics_are_stable() {
        assert_eq!(CtaEventType::Log.as_str(), "eCtaLog");
        assert_eq!(CtaEventType::Strategy.as_str(), "eCtaStrategy");
        assert_eq!(CtaEventType::StopOrder.as_str(), "eCtaStopOrder");
        assert_eq!("eCtaLog".parse::<CtaEventType>().unwrap(), CtaEventType::Log);
        assert!("ectalog".parse::<CtaEventType>().is_err());
        assert!("eCtaTrade".parse::<CtaEventType>().is_err());
    }

    #[test]
    fn test_event_type_follows_payload() {
        let log = CtaEvent::log("strategy started", Some("turtle_rb"));
        assert_eq!(log.event_type, CtaEventType::Log);
        assert_eq!(log.topic(), EVENT_CTA_LOG);
        assert!(log.idempotency_key.starts_with("eCtaLog:"));

        let order = StopOrder::new(
            "rb2010.SHFE",
            Direction::Short,
            Offset::Close,
            3500.0,
            1.0,
            "STOP.7",
            "turtle_rb",
        );
        let event = CtaEvent::stop_order(&order);
        assert_eq!(event.topic(), EVENT_CTA_STOPORDER);
        assert_eq!(event.payload, CtaEventPayload::StopOrder(order));

        let strategy = CtaEvent::strategy("turtle_rb", serde_json::json!({"inited": true}));
        assert_eq!(strategy.topic(), EVENT_CTA_STRATEGY);
    }

    #[test]
    fn test_json_line() {
        let event = CtaEvent::log("hello", None);
        let line = event.to_json().unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event_type"], "eCtaLog");
        assert_eq!(value["payload"]["type"], "Log");
        assert_eq!(value["payload"]["data"]["msg"], "hello");

        let parsed: CtaEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.payload, event.payload);
    }

    #[test]
    fn test_unique_idempotency_keys() {
        let a = CtaEvent::log("same", None);
        let b = CtaEvent::log("same", None);
        assert_ne!(a.idempotency_key, b.idempotency_key);
    }
}
