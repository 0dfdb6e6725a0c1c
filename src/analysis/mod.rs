//! Event selection and trijet mass reconstruction.
//!
//! Per event, strictly in this order:
//! ```text
//!   Event ──► filter ──► trijet (enumerate + b-tag gate)
//!                              │
//!                              ▼
//!              kinematics (sum, pt, signed mass)
//!                              │
//!                              ▼
//!          pipeline (max-pt trijet) ──► accumulator
//! ```

pub mod accumulator;
pub mod cuts;
pub mod filter;
pub mod kinematics;
pub mod pipeline;
pub mod trijet;
