//! # StockLens — server entry point
//!
//! ## Environment Variables
//!
//! | Variable                  | Default                            | Description                      |
//! |---------------------------|------------------------------------|----------------------------------|
//! | `BIND_ADDR`               | `0.0.0.0:3000`                     | Address Axum listens on          |
//! | `YAHOO_BASE_URL`          | `https://query1.finance.yahoo.com` | Quote / chart / news provider    |
//! | `FINMIND_BASE_URL`        | `https://api.finmindtrade.com`     | Institutional-flow provider      |
//! | `FINMIND_TOKEN`           | —                                  | Optional FinMind bearer token    |
//! | `UPSTREAM_TIMEOUT_SECS`   | `8`                                | Per-call upstream timeout        |
//! | `INTRADAY_INTERVAL`       | `5m`                               | Chart sampling interval          |
//! | `INTRADAY_LOOKBACK_HOURS` | `96`                               | Chart request window             |
//! | `FLOW_LOOKBACK_DAYS`      | `10`                               | Institutional-flow window        |
//! | `MARKET_UTC_OFFSET_HOURS` | `8`                                | Exchange-local offset            |
//! | `API_KEY`                 | —                                  | Require `X-API-Key` when set     |
//! | `RUST_LOG`                | `stocklens=debug`                  | Tracing filter                   |

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stocklens::{build_router, config::Config, state::build_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("stocklens=debug".parse()?)
                .add_directive("tower_http=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════╗
  ║        STOCKLENS — Dashboard Aggregator       ║
  ║   Quote · Chart · News · Institutional Flow   ║
  ╚═══════════════════════════════════════════════╝"#);

    // ── 3. Config & shared state ──────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;
    let addr = config.bind_addr;

    info!(
        yahoo     = %config.yahoo_base_url,
        finmind   = %config.finmind_base_url,
        timeout   = ?config.upstream_timeout,
        api_key   = config.api_key.is_some(),
        "Configuration loaded"
    );

    let state = build_state(config)?;

    // ── 4. Router ─────────────────────────────────────────────────────────────
    let app = build_router(state);

    // ── 5. Bind & Serve ───────────────────────────────────────────────────────
    info!(?addr, "🚀 StockLens server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
