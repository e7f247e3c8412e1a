//! Stage Gate
//!
//! Per-case state machine over the stage tabs. States are `Loading` (before
//! the classification is known) plus one state per stage name. Transitions
//! are user navigation events — always to a visible, unblocked stage — and
//! classification changes, which may force the active stage back to the
//! default when it becomes hidden or blocked.

use crate::resolver;
use casefile_types::{Classification, Stage};
use serde::{Deserialize, Serialize};

/// One rendered tab: the stage plus whether it is greyed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTab {
    pub stage: String,
    pub blocked: bool,
}

/// Snapshot handed to the case view after a classification change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateView {
    /// Visible stages in catalog order, each flagged blocked or usable.
    pub stages: Vec<StageTab>,
    /// The stage the case view should render.
    pub active: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    /// Navigation target is not rendered under the current classification.
    #[error("Stage '{0}' is not visible for this case")]
    StageHidden(String),

    /// Target is rendered but greyed out; the request must not dispatch.
    #[error("Stage '{0}' is blocked for this case")]
    StageBlocked(String),

    /// Navigation before the classification has been applied.
    #[error("Stage gate is still loading")]
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Loading,
    Active(String),
}

/// The gate itself. Owns the stage catalog (tab order) and the active stage.
#[derive(Debug, Clone)]
pub struct StageGate {
    catalog: Vec<String>,
    classification: Classification,
    state: GateState,
}

impl StageGate {
    /// Gate over an explicit stage catalog (names in tab order).
    pub fn new(catalog: Vec<String>) -> Self {
        Self {
            catalog,
            classification: Classification::unset(),
            state: GateState::Loading,
        }
    }

    /// Gate over the full built-in stage catalog.
    pub fn with_default_catalog() -> Self {
        Self::new(Stage::ALL.iter().map(|s| s.name().to_string()).collect())
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// The active stage, or `None` while still loading.
    pub fn active_stage(&self) -> Option<&str> {
        match &self.state {
            GateState::Loading => None,
            GateState::Active(stage) => Some(stage),
        }
    }

    /// Recompute the rendered tab set for a fresh classification and
    /// keep-or-reset the active stage. Applying the same classification
    /// twice in a row never moves the active stage on the second call.
    pub fn apply_classification(&mut self, classification: Classification) -> GateView {
        self.classification = classification;

        let current = match &self.state {
            GateState::Loading => Stage::DEFAULT.name().to_string(),
            GateState::Active(stage) => stage.clone(),
        };

        let active = if resolver::visible(&current, classification)
            && !resolver::blocked(&current, classification)
        {
            current
        } else {
            tracing::info!(
                stage = %current,
                "active stage invalid under new classification, resetting to default"
            );
            Stage::DEFAULT.name().to_string()
        };

        self.state = GateState::Active(active.clone());

        GateView {
            stages: self.rendered(),
            active,
        }
    }

    /// The currently rendered tabs, in catalog order.
    pub fn rendered(&self) -> Vec<StageTab> {
        self.catalog
            .iter()
            .filter(|stage| resolver::visible(stage, self.classification))
            .map(|stage| StageTab {
                stage: stage.clone(),
                blocked: resolver::blocked(stage, self.classification),
            })
            .collect()
    }

    /// User navigation. Rejected client-side for hidden or blocked targets;
    /// on rejection the active stage does not change and no request may be
    /// dispatched by the caller.
    pub fn navigate(&mut self, stage: &str) -> Result<(), GateError> {
        if matches!(self.state, GateState::Loading) {
            return Err(GateError::Loading);
        }
        if !resolver::visible(stage, self.classification) {
            return Err(GateError::StageHidden(stage.to_string()));
        }
        if resolver::blocked(stage, self.classification) {
            tracing::debug!(stage, "navigation to blocked stage rejected");
            return Err(GateError::StageBlocked(stage.to_string()));
        }
        self.state = GateState::Active(stage.to_string());
        Ok(())
    }
}

impl Default for StageGate {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}
