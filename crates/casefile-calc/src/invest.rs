//! Investment Aggregation
//!
//! Folds a stage's investment records into per-category totals and compares
//! the grand total against the ceiling for the case's group. All arithmetic
//! is `rust_decimal`; floats never touch money.

use casefile_types::{Group, Record};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Field names on an investment record.
pub const FIELD_CATEGORY: &str = "categoria";
pub const FIELD_ITEM: &str = "item";
pub const FIELD_QUANTITY: &str = "cantidad";
pub const FIELD_UNIT_PRICE: &str = "valor_unitario";

/// Unit prices for catalog items, keyed by item token.
pub type PriceCatalog = HashMap<String, Decimal>;

/// One investment line extracted from a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentLine {
    pub category: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl InvestmentLine {
    pub fn amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// Extract a line from a loaded record. The unit price comes from the
    /// catalog lookup when the record references a catalog item, otherwise
    /// from the record's own price field. Records missing a category or
    /// quantity yield nothing and are skipped by the fold.
    pub fn from_record(record: &Record, catalog: &PriceCatalog) -> Option<Self> {
        let category = record.get_str(FIELD_CATEGORY)?.to_string();
        let quantity = decimal_field(record, FIELD_QUANTITY)?;
        let unit_price = record
            .get_str(FIELD_ITEM)
            .and_then(|item| catalog.get(item).copied())
            .or_else(|| decimal_field(record, FIELD_UNIT_PRICE))?;
        Some(Self {
            category,
            quantity,
            unit_price,
        })
    }
}

/// Read a numeric field as a decimal, whether stored as JSON number or text.
fn decimal_field(record: &Record, field: &str) -> Option<Decimal> {
    match record.get(field)? {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Totals handed back up to the case view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    /// Total per category, in category name order.
    pub by_category: BTreeMap<String, Decimal>,
    pub grand_total: Decimal,
    /// Amount the beneficiary must cover: `max(0, grand_total - ceiling)`.
    pub counterpart: Decimal,
}

/// Fold investment lines into the stage summary against one ceiling.
pub fn summarize(lines: &[InvestmentLine], ceiling: Decimal) -> InvestmentSummary {
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for line in lines {
        *by_category.entry(line.category.clone()).or_default() += line.amount();
    }
    let grand_total: Decimal = by_category.values().copied().sum();
    let counterpart = (grand_total - ceiling).max(Decimal::ZERO);

    InvestmentSummary {
        by_category,
        grand_total,
        counterpart,
    }
}

/// Program ceilings per beneficiary group. Supplied as configuration; the
/// values are program parameters, not code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CeilingSchedule {
    ceilings: HashMap<Group, Decimal>,
}

impl CeilingSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, group: Group, ceiling: Decimal) -> &mut Self {
        self.ceilings.insert(group, ceiling);
        self
    }

    pub fn ceiling_for(&self, group: Group) -> Option<Decimal> {
        self.ceilings.get(&group).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(category: &str, quantity: Decimal, unit_price: Decimal) -> InvestmentLine {
        InvestmentLine {
            category: category.to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_totals_by_category() {
        let lines = vec![
            line("maquinaria", dec!(2), dec!(1500)),
            line("insumos", dec!(10), dec!(30)),
            line("maquinaria", dec!(1), dec!(500)),
        ];
        let summary = summarize(&lines, dec!(10000));

        assert_eq!(summary.by_category["maquinaria"], dec!(3500));
        assert_eq!(summary.by_category["insumos"], dec!(300));
        assert_eq!(summary.grand_total, dec!(3800));
        // Under the ceiling: nothing to cover.
        assert_eq!(summary.counterpart, Decimal::ZERO);
    }

    #[test]
    fn test_counterpart_over_ceiling() {
        let lines = vec![line("maquinaria", dec!(1), dec!(12500))];
        let summary = summarize(&lines, dec!(10000));
        assert_eq!(summary.counterpart, dec!(2500));
    }

    #[test]
    fn test_empty_fold() {
        let summary = summarize(&[], dec!(10000));
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.grand_total, Decimal::ZERO);
        assert_eq!(summary.counterpart, Decimal::ZERO);
    }

    #[test]
    fn test_line_from_record_prefers_catalog_price() {
        let mut catalog = PriceCatalog::new();
        catalog.insert("motobomba".to_string(), dec!(850));

        let mut record = Record::draft();
        record.set(FIELD_CATEGORY, "maquinaria");
        record.set(FIELD_ITEM, "motobomba");
        record.set(FIELD_QUANTITY, 2);
        record.set(FIELD_UNIT_PRICE, "999");

        let line = InvestmentLine::from_record(&record, &catalog).unwrap();
        assert_eq!(line.unit_price, dec!(850));
        assert_eq!(line.amount(), dec!(1700));
    }

    #[test]
    fn test_line_from_record_falls_back_to_own_price() {
        let catalog = PriceCatalog::new();
        let mut record = Record::draft();
        record.set(FIELD_CATEGORY, "insumos");
        record.set(FIELD_QUANTITY, "3");
        record.set(FIELD_UNIT_PRICE, 40);

        let line = InvestmentLine::from_record(&record, &catalog).unwrap();
        assert_eq!(line.amount(), dec!(120));
    }

    #[test]
    fn test_incomplete_record_is_skipped() {
        let catalog = PriceCatalog::new();
        let mut record = Record::draft();
        record.set(FIELD_CATEGORY, "insumos");
        assert!(InvestmentLine::from_record(&record, &catalog).is_none());
    }

    #[test]
    fn test_ceiling_schedule() {
        let mut schedule = CeilingSchedule::new();
        schedule.set(Group::One, dec!(8000)).set(Group::Three, dec!(12000));

        assert_eq!(schedule.ceiling_for(Group::One), Some(dec!(8000)));
        assert_eq!(schedule.ceiling_for(Group::Two), None);
    }
}
