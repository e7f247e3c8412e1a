//! Stage Gating Engine
//!
//! Two layers:
//!
//! - [`resolver`] — pure visibility/blocking rules over a case's
//!   `(group, modality)` classification. No side effects, no state.
//! - [`gate`] — the per-case state machine holding the active stage,
//!   recomputing the rendered tab set on every classification change and
//!   forcing navigation back to the default stage when the active one
//!   becomes invalid.
//!
//! The resolver fails **open**: a stage name without a rule is visible and
//! unblocked, so stages added to the catalog later do not silently vanish.
//! This is the deliberate opposite of the audit reader's fail-closed merge.

pub mod gate;
pub mod resolver;

pub use gate::{GateError, GateView, StageGate, StageTab};
pub use resolver::{blocked, visible};
