//! Classification Resolver
//!
//! Pure functions from `(stage name, group, modality)` to visibility and
//! blocking decisions. Rules are evaluated top-down, first match wins:
//!
//! - group unset: everything visible (bootstrap state before the case
//!   record is loaded)
//! - Group 3: a fixed allow-list of stages, regardless of modality
//! - Groups 1/2: an exception table hides the stages that belong to the
//!   other group or to Group 3 only; unlisted stages default to visible
//!
//! Blocking applies only inside Group 3, only to the three modality-gated
//! stages: the chosen modality unblocks exactly one of them and an unset or
//! unrecognized modality blocks all three.
//!
//! Unrecognized stage names are visible and unblocked on purpose.

use casefile_types::{Classification, Group, Modality, Stage};

/// Stages rendered for a Group 3 case. Everything else is hidden.
pub const GROUP3_STAGES: [Stage; 10] = [
    Stage::Data,
    Stage::ImprovementProposal,
    Stage::CurrentAssets,
    Stage::Credit,
    Stage::Lease,
    Stage::ProviderFormulation,
    Stage::Validations,
    Stage::BankingInfo,
    Stage::AnnexesV2,
    Stage::GenerateSheetG3,
];

/// The three stages whose usability depends on the chosen modality.
pub const MODALITY_STAGES: [Stage; 3] = [Stage::Credit, Stage::Lease, Stage::ProviderFormulation];

/// Should this stage's tab be rendered at all for the given classification?
pub fn visible(stage: &str, classification: Classification) -> bool {
    let group = match classification.group {
        Some(group) => group,
        // Classification not yet known: show everything.
        None => return true,
    };

    if group == Group::Three {
        return GROUP3_STAGES.iter().any(|s| s.name() == stage);
    }

    // Groups 1 and 2: exception table, unlisted stages default to visible.
    match stage {
        s if s == Stage::ProviderFormulation.name() || s == Stage::ProviderSheet.name() => {
            group == Group::One
        }
        s if s == Stage::KitFormulation.name() || s == Stage::KitSheet.name() => {
            group == Group::Two
        }
        s if s == Stage::Credit.name()
            || s == Stage::Lease.name()
            || s == Stage::BankingInfo.name()
            || s == Stage::AnnexesV2.name()
            || s == Stage::GenerateSheetG3.name() =>
        {
            false
        }
        _ => true,
    }
}

/// Is this stage rendered but unusable (greyed out) for the classification?
pub fn blocked(stage: &str, classification: Classification) -> bool {
    if classification.group != Some(Group::Three) {
        return false;
    }
    if !MODALITY_STAGES.iter().any(|s| s.name() == stage) {
        return false;
    }

    match classification.modality {
        Some(Modality::DebtCoverage) => stage != Stage::Credit.name(),
        Some(Modality::LeasePayment) => stage != Stage::Lease.name(),
        Some(Modality::GoodsProvisioning) => stage != Stage::ProviderFormulation.name(),
        // No modality chosen yet, or an unrecognized stored value: all
        // three stay blocked until the beneficiary picks one.
        None => true,
    }
}
