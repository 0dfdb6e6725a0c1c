//! Data layer: event model, column loading, and data-integrity errors.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read the eight named columns → EventColumns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ EventColumns │  jagged per-event columns, jet alignment checked once
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Event    │  one event materialised on demand (leptons + Jet records)
//!   └──────────┘
//! ```

pub mod error;
pub mod loader;
pub mod model;
