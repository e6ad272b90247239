//! Store record types
//!
//! Catalog rows and flattened history records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::calc::CalculationResult;
use crate::core::selection::{ComponentSelection, Selection};
use crate::core::slot::ComponentSlot;

// =========================================================================
// Catalog
// =========================================================================

/// A component stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogComponent {
    pub id: i64,
    pub slot: ComponentSlot,
    pub name: String,
    /// Unit mass in grams
    pub mass: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Slot-specific attribute (battery capacity, propeller size)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl CatalogComponent {
    /// Turn a catalog entry into a selection with the given quantity
    pub fn to_selection(&self, quantity: u32) -> ComponentSelection {
        ComponentSelection::new(self.name.clone(), self.mass, quantity).with_id(self.id)
    }
}

/// Field values for inserting or updating a catalog component
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewComponent {
    pub name: String,
    pub mass: f64,
    pub description: Option<String>,
    pub extra: Option<String>,
}

// =========================================================================
// History
// =========================================================================

/// One slot of a stored calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
}

/// A calculation as stored in history
///
/// Persisted flattened: `<slot>_id`, `<slot>_name`, `<slot>_mass` and
/// `<slot>_qty` for every slot, plus `total_mass` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Row ID, set once persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Local time, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    pub total_mass: f64,
    pub slots: BTreeMap<ComponentSlot, HistoryEntry>,
}

/// Format used for history timestamps
pub const HISTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl HistoryRecord {
    /// Build a record from a selection and its calculation result
    pub fn from_calculation(
        selection: &Selection,
        result: &CalculationResult,
        timestamp: chrono::NaiveDateTime,
    ) -> Self {
        let slots = result
            .per_component
            .iter()
            .map(|(slot, component)| {
                let entry = HistoryEntry {
                    id: selection.get(*slot).and_then(|c| c.id),
                    name: Some(component.name.clone()),
                    mass: Some(component.unit_mass),
                    qty: Some(component.quantity),
                };
                (*slot, entry)
            })
            .collect();

        Self {
            id: None,
            timestamp: timestamp.format(HISTORY_TIMESTAMP_FORMAT).to_string(),
            total_mass: result.total_mass,
            slots,
        }
    }

    /// Rebuild the selection this record was calculated from
    pub fn to_selection(&self) -> Selection {
        let mut selection = Selection::new();
        for (slot, entry) in &self.slots {
            selection.set(
                *slot,
                ComponentSelection {
                    id: entry.id,
                    name: entry.name.clone(),
                    unit_mass: entry.mass,
                    quantity: entry.qty,
                },
            );
        }
        selection
    }

    /// Flattened column names, in storage order
    pub fn columns() -> Vec<String> {
        let mut columns = vec!["id".to_string(), "timestamp".to_string()];
        for slot in ComponentSlot::ALL {
            for suffix in ["id", "name", "mass", "qty"] {
                columns.push(format!("{}_{}", slot.as_str(), suffix));
            }
        }
        columns.push("total_mass".to_string());
        columns
    }

    /// Flattened values matching [`HistoryRecord::columns`]; absent values are empty
    pub fn values(&self) -> Vec<String> {
        fn opt<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        let mut values = vec![opt(self.id), self.timestamp.clone()];
        for slot in ComponentSlot::ALL {
            let entry = self.slots.get(&slot);
            values.push(opt(entry.and_then(|e| e.id)));
            values.push(opt(entry.and_then(|e| e.name.clone())));
            values.push(opt(entry.and_then(|e| e.mass)));
            values.push(opt(entry.and_then(|e| e.qty)));
        }
        values.push(self.total_mass.to_string());
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calc::compute;
    use chrono::NaiveDate;

    fn sample() -> (Selection, CalculationResult) {
        let selection = Selection::new()
            .with(
                ComponentSlot::Frame,
                ComponentSelection::new("DJI F450", 282.0, 1).with_id(1),
            )
            .with(ComponentSlot::Motor, ComponentSelection::new("Custom", 56.0, 4));
        let result = compute(&selection);
        (selection, result)
    }

    fn at() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 5)
            .unwrap()
    }

    #[test]
    fn test_from_calculation() {
        let (selection, result) = sample();
        let record = HistoryRecord::from_calculation(&selection, &result, at());

        assert_eq!(record.timestamp, "2025-03-01 08:00:05");
        assert_eq!(record.total_mass, 506.0);
        assert_eq!(record.slots[&ComponentSlot::Frame].id, Some(1));
        assert_eq!(record.slots[&ComponentSlot::Motor].id, None);
        assert_eq!(record.slots[&ComponentSlot::Motor].qty, Some(4));
        assert!(!record.slots.contains_key(&ComponentSlot::Battery));
    }

    #[test]
    fn test_selection_roundtrip_gives_same_result() {
        let (selection, result) = sample();
        let record = HistoryRecord::from_calculation(&selection, &result, at());
        assert_eq!(compute(&record.to_selection()), result);
    }

    #[test]
    fn test_flattened_columns() {
        let columns = HistoryRecord::columns();
        assert_eq!(columns.len(), 2 + 6 * 4 + 1);
        assert_eq!(columns[2], "frame_id");
        assert!(columns.contains(&"flight_controller_qty".to_string()));
        assert_eq!(columns.last().unwrap(), "total_mass");

        let (selection, result) = sample();
        let values = HistoryRecord::from_calculation(&selection, &result, at()).values();
        assert_eq!(values.len(), columns.len());
        assert_eq!(values[3], "DJI F450");
        assert_eq!(values[10], "");
    }
}
