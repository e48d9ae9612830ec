//! # kirana-db: Database Layer for Kirana POS
//!
//! This crate provides database access for the Kirana POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kirana POS Data Flow                             │
//! │                                                                         │
//! │  Service call (e.g. CheckoutSession::checkout)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kirana-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  + Seeding   │   │   │
//! │  │   │               │    │ ProductRepo   │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ FlatRepo      │    │ 001_init.sql │   │   │
//! │  │   │ WAL, FKs on   │    │ SaleRepo      │    │ sample flats │   │   │
//! │  │   └───────────────┘    │ ReportRepo    │    └──────────────┘   │   │
//! │  │                        │ ShopRepo      │                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (kirana.db)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`seed`] - Idempotent first-run seeding
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kirana_db::{Database, DbConfig};
//!
//! // Connect, migrate, seed defaults
//! let db = Database::new(DbConfig::new("path/to/kirana.db")).await?;
//!
//! // Use repositories
//! let listing = db.products().list(Some("milk")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::flat::FlatRepository;
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::report::{DailySales, ReportRepository};
pub use repository::sale::{SaleDraft, SaleLine, SaleRepository};
pub use repository::shop::ShopRepository;
