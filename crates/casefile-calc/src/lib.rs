//! Stage-Local Calculators
//!
//! Pure folds over loaded records, with no I/O:
//!
//! - [`invest`] — per-category investment totals, the grand total, and the
//!   required counterpart against a classification-dependent ceiling.
//! - [`selection`] — bounded 1..3 selection-order bookkeeping for the
//!   shortlist of chosen records within a stage.
//!
//! Both run client-side over whatever the record store has loaded; the
//! selection board is a client-side invariant only and does not serialize
//! concurrent sessions (a documented limitation of the storage design).

pub mod invest;
pub mod selection;

pub use invest::{summarize, CeilingSchedule, InvestmentLine, InvestmentSummary, PriceCatalog};
pub use selection::{SelectionBoard, SelectionError, SELECTION_CAPACITY};
