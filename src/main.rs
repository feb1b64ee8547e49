/// Inspect the CTA market data for each `SYMBOL[=PRICE]` argument
///
/// Logs the underlying, tick size and session; with a price, also the price rounded to tick.
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ctabase::{
    config::load_config_with_tables,
    market::{round_to_tick, underlying_symbol, MarketTables},
    Config, APP_NAME,
};

fn main() -> anyhow::Result<()> {
    // Load configuration; built-in tables when CONFIG_PATH is unset
    let (config, tables) = match std::env::var("CONFIG_PATH") {
        Ok(path) => load_config_with_tables(&path)?,
        Err(_) => (Config::default(), MarketTables::builtin().clone()),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    info!(
        "{} ({} engine, {} mode)",
        APP_NAME, config.engine_type, config.backtesting_mode
    );

    let symbols: Vec<String> = std::env::args().skip(1).collect();
    if symbols.is_empty() {
        info!(
            "{} underlyings close at 23:00: {}",
            tables.night_market_23().len(),
            tables.night_market_23().codes().collect::<Vec<_>>().join(",")
        );
        return Ok(());
    }

    for arg in &symbols {
        let (symbol, price) = match arg.split_once('=') {
            Some((symbol, price)) => match price.parse::<f64>() {
                Ok(price) => (symbol, Some(price)),
                Err(_) => {
                    warn!("{}: invalid price {:?}", symbol, price);
                    continue;
                }
            },
            None => (arg.as_str(), None),
        };

        let underlying = match underlying_symbol(symbol) {
            Ok(underlying) => underlying,
            Err(e) => {
                warn!("{} ({})", e, e.error_code());
                continue;
            }
        };

        match (tables.session_of(&underlying), tables.price_tick(&underlying)) {
            (Some(session), Some(tick)) => {
                let close = session
                    .night_close()
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                info!(
                    "{}: underlying={} tick={} session={} night_close={}",
                    symbol, underlying, tick, session, close
                );
                if let Some(price) = price {
                    info!("{}: {} rounds to {}", symbol, price, round_to_tick(price, tick));
                }
            }
            _ => warn!("{}: underlying {} not in any tick table", symbol, underlying),
        }
    }

    Ok(())
}
