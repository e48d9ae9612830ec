//! # Repository Module
//!
//! Database repository implementations for Kirana POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service layer                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(Some("milk"))                               │
//! │       ▼                                                                 │
//! │  ProductRepository ── SQL ──► SQLite                                    │
//! │                                                                         │
//! │  All SQL lives here; callers only see typed records and DbError.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`shop::ShopRepository`] - singleton configuration row
//! - [`product::ProductRepository`] - catalog CRUD and lookups
//! - [`flat::FlatRepository`] - flat listing and the credit ledger
//! - [`sale::SaleRepository`] - sale reads and the atomic recording
//! - [`report::ReportRepository`] - the daily sales aggregation

pub mod flat;
pub mod product;
pub mod report;
pub mod sale;
pub mod shop;
