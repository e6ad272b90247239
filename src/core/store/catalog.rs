//! Catalog queries - list, fetch, add, update and delete components

use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Row};

use super::{CatalogComponent, NewComponent, Store, StoreError};
use crate::core::slot::ComponentSlot;

/// SELECT list for a slot's catalog table (extra column aliased)
fn select_columns(slot: ComponentSlot) -> String {
    match slot.extra_column() {
        Some(column) => format!("id, name, mass, description, {} AS extra", column),
        None => "id, name, mass, description, NULL AS extra".to_string(),
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(_) => None,
    }
}

fn component_from_row(slot: ComponentSlot, row: &Row<'_>) -> rusqlite::Result<CatalogComponent> {
    Ok(CatalogComponent {
        id: row.get(0)?,
        slot,
        name: row.get(1)?,
        mass: row.get(2)?,
        description: row.get(3)?,
        extra: value_to_text(row.get(4)?),
    })
}

impl Store {
    /// All catalog components for a slot, ordered by ID
    pub fn list_components(&self, slot: ComponentSlot) -> Result<Vec<CatalogComponent>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            select_columns(slot),
            slot.table_name()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| component_from_row(slot, row))?;

        let mut components = Vec::new();
        for row in rows {
            components.push(row?);
        }
        Ok(components)
    }

    /// Fetch one catalog component
    pub fn get_component(&self, slot: ComponentSlot, id: i64) -> Result<CatalogComponent, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_columns(slot),
            slot.table_name()
        );
        self.conn
            .query_row(&sql, params![id], |row| component_from_row(slot, row))
            .optional()?
            .ok_or(StoreError::ComponentNotFound { slot, id })
    }

    /// Insert a component, returning its new ID
    pub fn add_component(&self, slot: ComponentSlot, component: &NewComponent) -> Result<i64, StoreError> {
        match slot.extra_column() {
            Some(column) => {
                self.conn.execute(
                    &format!(
                        "INSERT INTO {} (name, mass, description, {}) VALUES (?1, ?2, ?3, ?4)",
                        slot.table_name(),
                        column
                    ),
                    params![
                        component.name,
                        component.mass,
                        component.description,
                        component.extra
                    ],
                )?;
            }
            None => {
                self.conn.execute(
                    &format!(
                        "INSERT INTO {} (name, mass, description) VALUES (?1, ?2, ?3)",
                        slot.table_name()
                    ),
                    params![component.name, component.mass, component.description],
                )?;
            }
        }

        let id = self.conn.last_insert_rowid();
        tracing::debug!(%slot, id, name = %component.name, "catalog component added");
        Ok(id)
    }

    /// Replace the fields of an existing component
    pub fn update_component(
        &self,
        slot: ComponentSlot,
        id: i64,
        component: &NewComponent,
    ) -> Result<(), StoreError> {
        let changed = match slot.extra_column() {
            Some(column) => self.conn.execute(
                &format!(
                    "UPDATE {} SET name = ?1, mass = ?2, description = ?3, {} = ?4 WHERE id = ?5",
                    slot.table_name(),
                    column
                ),
                params![
                    component.name,
                    component.mass,
                    component.description,
                    component.extra,
                    id
                ],
            )?,
            None => self.conn.execute(
                &format!(
                    "UPDATE {} SET name = ?1, mass = ?2, description = ?3 WHERE id = ?4",
                    slot.table_name()
                ),
                params![component.name, component.mass, component.description, id],
            )?,
        };

        if changed == 0 {
            return Err(StoreError::ComponentNotFound { slot, id });
        }
        Ok(())
    }

    /// Remove a component from the catalog
    pub fn delete_component(&self, slot: ComponentSlot, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", slot.table_name()),
            params![id],
        )?;
        if changed == 0 {
            return Err(StoreError::ComponentNotFound { slot, id });
        }
        tracing::debug!(%slot, id, "catalog component deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_is_seeded() {
        let store = Store::open_in_memory().unwrap();
        for slot in ComponentSlot::ALL {
            assert_eq!(store.list_components(slot).unwrap().len(), 5, "{}", slot);
        }

        let frames = store.list_components(ComponentSlot::Frame).unwrap();
        assert_eq!(frames[0].name, "DJI F450");
        assert_eq!(frames[0].mass, 282.0);
        assert!(frames[0].extra.is_none());
    }

    #[test]
    fn test_extra_columns() {
        let store = Store::open_in_memory().unwrap();
        let battery = store.get_component(ComponentSlot::Battery, 1).unwrap();
        assert_eq!(battery.extra.as_deref(), Some("2200"));

        let prop = store.get_component(ComponentSlot::Propeller, 2).unwrap();
        assert_eq!(prop.name, "Gemfan 5040");
        assert_eq!(prop.extra.as_deref(), Some("5 inch"));
    }

    #[test]
    fn test_add_update_delete() {
        let store = Store::open_in_memory().unwrap();
        let id = store
            .add_component(
                ComponentSlot::Frame,
                &NewComponent {
                    name: "Test Frame".to_string(),
                    mass: 150.0,
                    description: Some("Тестовый корпус".to_string()),
                    extra: None,
                },
            )
            .unwrap();

        let added = store.get_component(ComponentSlot::Frame, id).unwrap();
        assert_eq!(added.name, "Test Frame");

        store
            .update_component(
                ComponentSlot::Frame,
                id,
                &NewComponent {
                    name: "Renamed".to_string(),
                    mass: 155.5,
                    description: None,
                    extra: None,
                },
            )
            .unwrap();
        let updated = store.get_component(ComponentSlot::Frame, id).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.mass, 155.5);
        assert!(updated.description.is_none());

        store.delete_component(ComponentSlot::Frame, id).unwrap();
        assert!(matches!(
            store.get_component(ComponentSlot::Frame, id),
            Err(StoreError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_component_errors() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.delete_component(ComponentSlot::Camera, 999).is_err());
        assert!(store
            .update_component(ComponentSlot::Camera, 999, &NewComponent::default())
            .is_err());
    }

    #[test]
    fn test_catalog_entry_to_selection() {
        let store = Store::open_in_memory().unwrap();
        let motor = store.get_component(ComponentSlot::Motor, 1).unwrap();
        let selection = motor.to_selection(4);
        assert_eq!(selection.id, Some(1));
        assert_eq!(selection.unit_mass, Some(56.0));
        assert_eq!(selection.quantity, Some(4));
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/db.sqlite");
        {
            let store = Store::open(&path).unwrap();
            store.delete_component(ComponentSlot::Motor, 1).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.list_components(ComponentSlot::Motor).unwrap().len(), 4);
        assert_eq!(store.list_components(ComponentSlot::Frame).unwrap().len(), 5);
    }

    #[test]
    fn test_emptied_slot_stays_empty_after_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("db.sqlite");
        {
            let store = Store::open(&path).unwrap();
            for frame in store.list_components(ComponentSlot::Frame).unwrap() {
                store.delete_component(ComponentSlot::Frame, frame.id).unwrap();
            }
        }
        let store = Store::open(&path).unwrap();
        assert!(store.list_components(ComponentSlot::Frame).unwrap().is_empty());
        assert_eq!(store.list_components(ComponentSlot::Motor).unwrap().len(), 5);
    }
}
