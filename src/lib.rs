//! # courtbook
//!
//! REST gateway for pickleball court events.
//!
//! Players join events whose capacity and skill bounds were fixed when the
//! event was scheduled. A full event keeps a FIFO waitlist; when a
//! participant leaves, the oldest waitlist entry is promoted into the freed
//! slot in the same atomic unit as the departure.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, x-user-id header)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── CurrentUser extractor (identity)
//!     │
//!     ├── MembershipService (service/)
//!     ├── EventBus (domain/) ──► promotion notifier (notify)
//!     │
//!     ├── EventRoster: eligibility, ledger, promotion (domain/)
//!     │
//!     └── MembershipStore (persistence/)
//!           ├── MemoryStore   (per-event mutex)
//!           └── PostgresStore (row-locked transactions)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod identity;
pub mod notify;
pub mod persistence;
pub mod service;
