//! # kirana-pos: Operator-Facing Service Layer
//!
//! Everything a desktop shell's event handlers would call. The shell owns
//! widgets and dialogs; this crate owns the behavior behind them.
//!
//! ## Module Organization
//! ```text
//! kirana_pos/
//! ├── lib.rs          ◄─── You are here (tracing init, store bootstrap)
//! ├── checkout.rs     ◄─── CheckoutSession: cart, totals, sale finalization
//! ├── catalog.rs      ◄─── Inventory screen: list/add/edit/delete
//! ├── ledger.rs       ◄─── Flats screen: balances and payments
//! ├── reports.rs      ◄─── Reports screen: daily sales aggregation
//! ├── settings.rs     ◄─── Shop identity and GST rate
//! └── error.rs        ◄─── PosError, the unified operator-facing error
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. init_tracing() ───────────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, override with RUST_LOG                             │
//! │                                                                         │
//! │  2. open_store().await ───────────────────────────────────────────────► │
//! │     • Resolve the platform data directory (or KIRANA_DB_PATH)           │
//! │     • Connect to SQLite, run migrations, seed defaults                  │
//! │                                                                         │
//! │  3. CheckoutSession::begin(&db).await ────────────────────────────────► │
//! │     • Load the GST rate, start with an empty cart                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod reports;
pub mod settings;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use checkout::{CheckoutSession, PaymentSelection, Receipt, ReceiptLine};
pub use error::{ErrorCode, PosError};
pub use reports::SalesReport;

use kirana_db::{Database, DbConfig};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kirana=trace` - Show trace for kirana crates only
/// - Default: INFO level, kirana crates at DEBUG, sqlx quiet
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kirana=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Opens the store at the platform's data directory.
///
/// Connecting runs migrations and first-run seeding, so the returned
/// handle is ready to use.
pub async fn open_store() -> Result<Database, PosError> {
    let db_path = default_database_path()
        .map_err(|e| PosError::new(ErrorCode::StorageError, e.to_string()))?;
    info!(path = %db_path.display(), "Opening store");

    let db = Database::new(DbConfig::new(db_path)).await?;
    Ok(db)
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.kirana.pos/kirana.db`
/// - **Windows**: `%APPDATA%\kirana\pos\kirana.db`
/// - **Linux**: `~/.local/share/kirana-pos/kirana.db`
///
/// ## Development Override
/// Set the `KIRANA_DB_PATH` environment variable to use a custom path.
pub fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("KIRANA_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs =
        ProjectDirs::from("com", "kirana", "pos").ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("kirana.db"))
}
