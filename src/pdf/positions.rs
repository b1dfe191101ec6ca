//! Field position registry — where each answer lands on the template form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Target page and coordinate for one answer, in the template document's
/// coordinate system (points, origin at the bottom-left of each page).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPosition {
    pub page_index: u32,
    pub x: f32,
    pub y: f32,
}

impl FieldPosition {
    const fn new(page_index: u32, x: f32, y: f32) -> Self {
        Self { page_index, x, y }
    }
}

/// Immutable mapping from answer key to field position.
///
/// An answer key may have zero or one position; keys without a position are
/// collected during the interview but never rendered. Backed by a `BTreeMap`
/// so iteration (and therefore overlay output) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct PositionRegistry {
    positions: BTreeMap<String, FieldPosition>,
}

impl PositionRegistry {
    pub fn new(positions: BTreeMap<String, FieldPosition>) -> Self {
        Self { positions }
    }

    pub fn get(&self, key: &str) -> Option<&FieldPosition> {
        self.positions.get(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Fields mapped to the given page, in key order.
    pub fn on_page(&self, page_index: u32) -> impl Iterator<Item = (&str, &FieldPosition)> {
        self.positions
            .iter()
            .filter(move |(_, pos)| pos.page_index == page_index)
            .map(|(key, pos)| (key.as_str(), pos))
    }
}

impl FromIterator<(String, FieldPosition)> for PositionRegistry {
    fn from_iter<T: IntoIterator<Item = (String, FieldPosition)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Coordinates for the Missouri IFP fee-waiver form. The x/y values are tuned
/// against that exact PDF; deployments with a different template revision
/// must re-tune them.
pub fn default_positions() -> PositionRegistry {
    let entries: [(&str, FieldPosition); 17] = [
        ("full_name", FieldPosition::new(0, 120.0, 700.0)),
        ("address", FieldPosition::new(0, 120.0, 680.0)),
        ("city_state_zip", FieldPosition::new(0, 120.0, 660.0)),
        ("phone", FieldPosition::new(0, 120.0, 640.0)),
        ("email", FieldPosition::new(0, 360.0, 640.0)),
        ("case_type", FieldPosition::new(0, 120.0, 615.0)),
        ("employment_status", FieldPosition::new(0, 120.0, 590.0)),
        ("monthly_income", FieldPosition::new(0, 120.0, 570.0)),
        ("cash_on_hand", FieldPosition::new(0, 120.0, 550.0)),
        ("bank_balance", FieldPosition::new(0, 120.0, 530.0)),
        ("monthly_expenses", FieldPosition::new(0, 120.0, 510.0)),
        ("dependents", FieldPosition::new(0, 120.0, 490.0)),
        ("government_assistance", FieldPosition::new(0, 120.0, 470.0)),
        ("debts", FieldPosition::new(0, 120.0, 450.0)),
        ("hardship_explanation", FieldPosition::new(0, 120.0, 420.0)),
        ("date_signed", FieldPosition::new(0, 120.0, 160.0)),
        ("signature_name", FieldPosition::new(0, 360.0, 160.0)),
    ];
    entries
        .into_iter()
        .map(|(key, pos)| (key.to_string(), pos))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_questions;

    #[test]
    fn default_registry_covers_known_fields() {
        let registry = default_positions();
        assert_eq!(registry.len(), 17);
        let pos = registry.get("full_name").unwrap();
        assert_eq!(pos.page_index, 0);
        assert_eq!(pos.x, 120.0);
        assert_eq!(pos.y, 700.0);
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn every_position_key_is_a_schema_key() {
        let registry = default_positions();
        let schema = default_questions();
        let keys: std::collections::HashSet<&str> =
            schema.iter().map(|q| q.key.as_str()).collect();
        for (key, _) in registry.on_page(0) {
            assert!(keys.contains(key), "{key} is not in the question schema");
        }
    }

    #[test]
    fn on_page_filters_by_page_index() {
        let registry: PositionRegistry = [
            ("a".to_string(), FieldPosition::new(0, 10.0, 10.0)),
            ("b".to_string(), FieldPosition::new(1, 20.0, 20.0)),
            ("c".to_string(), FieldPosition::new(1, 30.0, 30.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.on_page(0).count(), 1);
        let page_one: Vec<&str> = registry.on_page(1).map(|(k, _)| k).collect();
        assert_eq!(page_one, vec!["b", "c"]);
        assert_eq!(registry.on_page(2).count(), 0);
    }
}
