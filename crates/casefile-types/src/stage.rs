//! Stage Catalog
//!
//! One `Stage` per tab of the case view. Each stage has a canonical wire
//! token used in storage-service paths and attachment naming. The gating
//! rules key on stage *names* rather than this enum so that stages added to
//! the catalog later fail open instead of disappearing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The known data-collection stages of a case file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Data,
    Diagnostics,
    ImprovementProposal,
    CurrentAssets,
    AssetInventory,
    InvestmentPlan,
    Credit,
    Lease,
    ProviderFormulation,
    ProviderSheet,
    KitFormulation,
    KitSheet,
    Validations,
    BankingInfo,
    Annexes,
    AnnexesV2,
    GenerateSheet,
    GenerateSheetG3,
}

impl Stage {
    /// Every known stage, in tab order.
    pub const ALL: [Stage; 18] = [
        Stage::Data,
        Stage::Diagnostics,
        Stage::ImprovementProposal,
        Stage::CurrentAssets,
        Stage::AssetInventory,
        Stage::InvestmentPlan,
        Stage::Credit,
        Stage::Lease,
        Stage::ProviderFormulation,
        Stage::ProviderSheet,
        Stage::KitFormulation,
        Stage::KitSheet,
        Stage::Validations,
        Stage::BankingInfo,
        Stage::Annexes,
        Stage::AnnexesV2,
        Stage::GenerateSheet,
        Stage::GenerateSheetG3,
    ];

    /// The one stage that is always visible and never blocked. Navigation
    /// falls back here whenever the active stage becomes invalid.
    pub const DEFAULT: Stage = Stage::Data;

    /// Canonical wire token, used in storage paths and attachment names.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Data => "datos",
            Stage::Diagnostics => "diagnostico",
            Stage::ImprovementProposal => "propuesta_mejora",
            Stage::CurrentAssets => "activos_actuales",
            Stage::AssetInventory => "inventario_activos",
            Stage::InvestmentPlan => "plan_inversion",
            Stage::Credit => "credito",
            Stage::Lease => "arrendamiento",
            Stage::ProviderFormulation => "formulacion_proveeduria",
            Stage::ProviderSheet => "ficha_proveeduria",
            Stage::KitFormulation => "formulacion_kit",
            Stage::KitSheet => "ficha_kit",
            Stage::Validations => "validaciones",
            Stage::BankingInfo => "info_bancaria",
            Stage::Annexes => "anexos",
            Stage::AnnexesV2 => "anexos_v2",
            Stage::GenerateSheet => "generar_ficha",
            Stage::GenerateSheetG3 => "generar_ficha_g3",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown stage name: {0}")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}
