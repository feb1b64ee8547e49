/// Application name registered with the main engine
pub const APP_NAME: &str = "CtaStrategyPro";

/// Prefix of locally generated stop order ids ("STOP.1", "STOP.2", ...)
pub const STOPORDER_PREFIX: &str = "STOP";

// Event bus topics
pub const EVENT_CTA_LOG: &str = "eCtaLog";
pub const EVENT_CTA_STRATEGY: &str = "eCtaStrategy";
pub const EVENT_CTA_STOPORDER: &str = "eCtaStopOrder";
