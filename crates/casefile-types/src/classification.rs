//! Case Classification
//!
//! A case carries a `Group` (assigned at intake) and, only meaningful for
//! Group 3, a `Modality` — the investment mechanism the beneficiary chose.
//! Both are stored as free-text program labels, so parsing is lenient:
//! anything unrecognized maps to "unset" rather than an error, and the
//! gating rules treat unset defensively.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Beneficiary group assigned at case intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    One,
    Two,
    Three,
}

impl Group {
    /// Canonical program label as stored on the case record.
    pub fn label(&self) -> &'static str {
        match self {
            Group::One => "Grupo 1",
            Group::Two => "Grupo 2",
            Group::Three => "Grupo 3",
        }
    }

    /// Parse a stored classification label. Accepts the canonical
    /// `"Grupo N"` labels and bare digits; anything else is unset.
    pub fn from_label(label: &str) -> Option<Group> {
        match label.trim() {
            "Grupo 1" | "grupo 1" | "1" => Some(Group::One),
            "Grupo 2" | "grupo 2" | "2" => Some(Group::Two),
            "Grupo 3" | "grupo 3" | "3" => Some(Group::Three),
            _ => None,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Investment mechanism chosen inside the credit/lease/provisioning stage.
/// Only meaningful when the case is in Group 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    DebtCoverage,
    LeasePayment,
    GoodsProvisioning,
}

impl Modality {
    /// Program wording as stored on the case record.
    pub fn label(&self) -> &'static str {
        match self {
            Modality::DebtCoverage => "Pago de pasivos",
            Modality::LeasePayment => "Pago de canon de arrendamiento",
            Modality::GoodsProvisioning => "Proveeduría de bienes e insumos",
        }
    }

    /// Parse the stored label. Unknown labels are treated as unset, which
    /// blocks all three modality-gated stages downstream.
    pub fn from_label(label: &str) -> Option<Modality> {
        match label.trim() {
            "Pago de pasivos" => Some(Modality::DebtCoverage),
            "Pago de canon de arrendamiento" => Some(Modality::LeasePayment),
            "Proveeduría de bienes e insumos" => Some(Modality::GoodsProvisioning),
            _ => None,
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The (group, modality) pair that drives all stage gating. Changing the
/// modality is a total overwrite of the field, never a merge, so this is a
/// plain value type recomputed from the case record on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub group: Option<Group>,
    pub modality: Option<Modality>,
}

impl Classification {
    /// Bootstrap state before the case record has been loaded.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(group: Option<Group>, modality: Option<Modality>) -> Self {
        Self { group, modality }
    }

    /// Build from the raw labels stored on the case record.
    pub fn from_labels(group: &str, modality: &str) -> Self {
        Self {
            group: Group::from_label(group),
            modality: Modality::from_label(modality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_label_roundtrip() {
        for group in [Group::One, Group::Two, Group::Three] {
            assert_eq!(Group::from_label(group.label()), Some(group));
        }
    }

    #[test]
    fn test_group_accepts_bare_digit() {
        assert_eq!(Group::from_label("3"), Some(Group::Three));
        assert_eq!(Group::from_label(" 2 "), Some(Group::Two));
    }

    #[test]
    fn test_unknown_group_is_unset() {
        assert_eq!(Group::from_label("Grupo 4"), None);
        assert_eq!(Group::from_label(""), None);
    }

    #[test]
    fn test_modality_labels() {
        assert_eq!(
            Modality::from_label("Pago de canon de arrendamiento"),
            Some(Modality::LeasePayment)
        );
        assert_eq!(Modality::from_label("Pago de pasivos"), Some(Modality::DebtCoverage));
        assert_eq!(Modality::from_label("otra cosa"), None);
    }

    #[test]
    fn test_classification_from_labels() {
        let class = Classification::from_labels("Grupo 3", "Pago de pasivos");
        assert_eq!(class.group, Some(Group::Three));
        assert_eq!(class.modality, Some(Modality::DebtCoverage));

        let unset = Classification::from_labels("", "");
        assert_eq!(unset, Classification::unset());
    }
}
