//! Calculation history - save, list, fetch and delete flattened records

use std::collections::BTreeMap;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::{HistoryEntry, HistoryRecord, Store, StoreError};
use crate::core::slot::ComponentSlot;

/// Column list shared by all history SELECTs: id, timestamp, total_mass, then
/// four columns per slot in canonical order
fn history_select() -> String {
    let mut columns = vec![
        "id".to_string(),
        "timestamp".to_string(),
        "total_mass".to_string(),
    ];
    for slot in ComponentSlot::ALL {
        for suffix in ["id", "name", "mass", "qty"] {
            columns.push(format!("{}_{}", slot.as_str(), suffix));
        }
    }
    format!("SELECT {} FROM calculations_history", columns.join(", "))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let mut slots = BTreeMap::new();

    for (i, slot) in ComponentSlot::ALL.into_iter().enumerate() {
        let base = 3 + i * 4;
        let entry = HistoryEntry {
            id: row.get(base)?,
            name: row.get(base + 1)?,
            mass: row.get(base + 2)?,
            qty: row
                .get::<_, Option<i64>>(base + 3)?
                .and_then(|q| u32::try_from(q).ok()),
        };
        if entry.id.is_some() || entry.name.is_some() || entry.mass.is_some() {
            slots.insert(slot, entry);
        }
    }

    Ok(HistoryRecord {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        total_mass: row.get(2)?,
        slots,
    })
}

fn opt_value<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

impl Store {
    /// Persist a calculation, returning its history ID
    pub fn save_calculation(&self, record: &HistoryRecord) -> Result<i64, StoreError> {
        let mut columns = vec!["timestamp".to_string(), "total_mass".to_string()];
        let mut values = vec![
            Value::Text(record.timestamp.clone()),
            Value::Real(record.total_mass),
        ];

        for (slot, entry) in &record.slots {
            let key = slot.as_str();
            columns.push(format!("{}_id", key));
            columns.push(format!("{}_name", key));
            columns.push(format!("{}_mass", key));
            columns.push(format!("{}_qty", key));
            values.push(opt_value(entry.id));
            values.push(opt_value(entry.name.clone()));
            values.push(opt_value(entry.mass));
            values.push(opt_value(entry.qty.map(i64::from)));
        }

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO calculations_history ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(values))?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, total_mass = record.total_mass, "calculation saved to history");
        Ok(id)
    }

    /// Most recent calculations first
    pub fn calculation_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let sql = format!("{} ORDER BY timestamp DESC, id DESC LIMIT ?1", history_select());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64], record_from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Fetch one stored calculation
    pub fn get_calculation(&self, id: i64) -> Result<HistoryRecord, StoreError> {
        let sql = format!("{} WHERE id = ?1", history_select());
        self.conn
            .query_row(&sql, params![id], record_from_row)
            .optional()?
            .ok_or(StoreError::CalculationNotFound(id))
    }

    /// Remove a calculation from history
    pub fn delete_calculation(&self, id: i64) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM calculations_history WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::CalculationNotFound(id));
        }
        Ok(())
    }
    /// Remove every calculation from history, returning how many were removed
    pub fn clear_history(&self) -> Result<usize, StoreError> {
        let removed = self.conn.execute("DELETE FROM calculations_history", [])?;
        tracing::info!(removed, "calculation history cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calc::compute;
    use crate::core::selection::{ComponentSelection, Selection};
    use chrono::NaiveDate;

    fn record_at(day: u32, selection: &Selection) -> HistoryRecord {
        let at = NaiveDate::from_ymd_opt(2025, 2, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        HistoryRecord::from_calculation(selection, &compute(selection), at)
    }

    fn quad() -> Selection {
        Selection::new()
            .with(
                ComponentSlot::Frame,
                ComponentSelection::new("DJI F450", 282.0, 1).with_id(1),
            )
            .with(
                ComponentSlot::Motor,
                ComponentSelection::new("DJI E305", 56.0, 4).with_id(1),
            )
            .with(
                ComponentSlot::FlightController,
                ComponentSelection::new("Pixhawk 4", 38.0, 1),
            )
    }

    #[test]
    fn test_save_and_fetch() {
        let store = Store::open_in_memory().unwrap();
        let record = record_at(1, &quad());
        let id = store.save_calculation(&record).unwrap();

        let fetched = store.get_calculation(id).unwrap();
        assert_eq!(fetched.id, Some(id));
        assert_eq!(fetched.timestamp, record.timestamp);
        assert_eq!(fetched.total_mass, 282.0 + 224.0 + 38.0);
        assert_eq!(fetched.slots, record.slots);
    }

    #[test]
    fn test_fetched_record_recomputes_identically() {
        let store = Store::open_in_memory().unwrap();
        let id = store.save_calculation(&record_at(1, &quad())).unwrap();
        let fetched = store.get_calculation(id).unwrap();
        assert_eq!(compute(&fetched.to_selection()), compute(&quad()));
    }

    #[test]
    fn test_history_newest_first_with_limit() {
        let store = Store::open_in_memory().unwrap();
        let single = Selection::new()
            .with(ComponentSlot::Camera, ComponentSelection::new("GoPro", 154.0, 1));

        store.save_calculation(&record_at(1, &quad())).unwrap();
        let newest = store.save_calculation(&record_at(3, &single)).unwrap();
        store.save_calculation(&record_at(2, &quad())).unwrap();

        let history = store.calculation_history(2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, Some(newest));
        assert_eq!(history[0].slots.len(), 1);
        assert!(history[0].timestamp > history[1].timestamp);
    }

    #[test]
    fn test_delete_calculation() {
        let store = Store::open_in_memory().unwrap();
        let id = store.save_calculation(&record_at(1, &quad())).unwrap();
        store.delete_calculation(id).unwrap();

        assert!(matches!(
            store.get_calculation(id),
            Err(StoreError::CalculationNotFound(_))
        ));
        assert!(store.delete_calculation(id).is_err());
    }

    #[test]
    fn test_clear_history() {
        let store = Store::open_in_memory().unwrap();
        store.save_calculation(&record_at(1, &quad())).unwrap();
        store.save_calculation(&record_at(2, &quad())).unwrap();

        assert_eq!(store.clear_history().unwrap(), 2);
        assert!(store.calculation_history(10).unwrap().is_empty());
        assert_eq!(store.clear_history().unwrap(), 0);

        // The catalog is untouched
        assert_eq!(store.list_components(ComponentSlot::Frame).unwrap().len(), 5);
    }
}
