//! Trijet mass reconstruction for semileptonic top-quark pair events.
//!
//! The crate reads per-event particle columns (`data`), applies the
//! lepton / jet / b-tag selection and picks one trijet per surviving event
//! (`analysis`), and bins the resulting masses (`histogram`).

pub mod analysis;
pub mod data;
pub mod histogram;
