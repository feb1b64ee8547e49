/// Exchange session patterns and trading-time checks (China Standard Time)
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Asia::Shanghai;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TradingError};

/// Trading window in exchange local time; wraps past midnight when `end < start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    start_min: u32,
    end_min: u32,
}

const fn window(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> SessionWindow {
    SessionWindow {
        start_min: start_h * 60 + start_m,
        end_min: end_h * 60 + end_m,
    }
}

impl SessionWindow {
    pub fn start(&self) -> NaiveTime {
        minute_to_time(self.start_min)
    }

    pub fn end(&self) -> NaiveTime {
        minute_to_time(self.end_min)
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_min < self.start_min
    }

    /// Start inclusive, end exclusive
    pub fn contains(&self, time: NaiveTime) -> bool {
        let secs = time.num_seconds_from_midnight();
        let start = self.start_min * 60;
        let end = self.end_min * 60;

        if self.crosses_midnight() {
            secs >= start || secs < end
        } else {
            secs >= start && secs < end
        }
    }
}

fn minute_to_time(minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap_or_default()
}

// Commodity exchanges: 9:00~10:15, 10:30~11:30, 13:30~15:00
const COMMODITY_DAY: [SessionWindow; 3] = [
    window(9, 0, 10, 15),
    window(10, 30, 11, 30),
    window(13, 30, 15, 0),
];

// Night windows are listed first: the trading day opens the evening before
const SQ1_WINDOWS: [SessionWindow; 4] = [
    window(21, 0, 2, 30),
    COMMODITY_DAY[0],
    COMMODITY_DAY[1],
    COMMODITY_DAY[2],
];

const SQ2_WINDOWS: [SessionWindow; 4] = [
    window(21, 0, 1, 0),
    COMMODITY_DAY[0],
    COMMODITY_DAY[1],
    COMMODITY_DAY[2],
];

const NIGHT_23_WINDOWS: [SessionWindow; 4] = [
    window(21, 0, 23, 0),
    COMMODITY_DAY[0],
    COMMODITY_DAY[1],
    COMMODITY_DAY[2],
];

// CFFEX: 9:15~11:30, 13:00~15:15
const ZJ_WINDOWS: [SessionWindow; 2] = [window(9, 15, 11, 30), window(13, 0, 15, 15)];

/// Trading-session pattern of an underlying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketSession {
    /// SHFE, night until 02:30
    NightSq1,
    /// SHFE, night until 01:00
    NightSq2,
    /// SHFE, night until 23:00
    NightSq3,
    /// CZCE, night until 23:00
    NightZz,
    /// DCE, night until 23:00
    NightDl,
    /// CFFEX, day only
    Zj,
    DayOnly,
}

impl MarketSession {
    pub const ALL: [MarketSession; 7] = [
        MarketSession::NightSq1,
        MarketSession::NightSq2,
        MarketSession::NightSq3,
        MarketSession::NightZz,
        MarketSession::NightDl,
        MarketSession::Zj,
        MarketSession::DayOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSession::NightSq1 => "NIGHT_SQ1",
            MarketSession::NightSq2 => "NIGHT_SQ2",
            MarketSession::NightSq3 => "NIGHT_SQ3",
            MarketSession::NightZz => "NIGHT_ZZ",
            MarketSession::NightDl => "NIGHT_DL",
            MarketSession::Zj => "ZJ",
            MarketSession::DayOnly => "DAY_ONLY",
        }
    }

    /// Name of the tick table holding this session's underlyings
    pub fn table_name(&self) -> &'static str {
        match self {
            MarketSession::NightSq1 => "NIGHT_MARKET_SQ1",
            MarketSession::NightSq2 => "NIGHT_MARKET_SQ2",
            MarketSession::NightSq3 => "NIGHT_MARKET_SQ3",
            MarketSession::NightZz => "NIGHT_MARKET_ZZ",
            MarketSession::NightDl => "NIGHT_MARKET_DL",
            MarketSession::Zj => "MARKET_ZJ",
            MarketSession::DayOnly => "MARKET_DAY_ONLY",
        }
    }

    pub fn windows(&self) -> &'static [SessionWindow] {
        match self {
            MarketSession::NightSq1 => &SQ1_WINDOWS,
            MarketSession::NightSq2 => &SQ2_WINDOWS,
            MarketSession::NightSq3 | MarketSession::NightZz | MarketSession::NightDl => {
                &NIGHT_23_WINDOWS
            }
            MarketSession::Zj => &ZJ_WINDOWS,
            MarketSession::DayOnly => &COMMODITY_DAY,
        }
    }

    pub fn has_night_session(&self) -> bool {
        self.night_close().is_some()
    }

    /// Closing time of the night session, if any
    pub fn night_close(&self) -> Option<NaiveTime> {
        match self {
            MarketSession::Zj | MarketSession::DayOnly => None,
            _ => self.windows().first().map(SessionWindow::end),
        }
    }

    /// Check whether `now` falls inside one of the session's windows
    ///
    /// Time-of-day only: weekends and exchange holidays are not considered.
    pub fn is_trading_time(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&Shanghai).time();
        self.windows().iter().any(|w| w.contains(local))
    }
}

impl FromStr for MarketSession {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_uppercase();
        MarketSession::ALL
            .into_iter()
            .find(|session| session.as_str() == upper || session.table_name() == upper)
            .ok_or_else(|| TradingError::unknown_variant("market session", s))
    }
}

impl fmt::Display for MarketSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
