//! Database schema initialization and default catalog

use rusqlite::params;

use super::{Store, StoreError, SCHEMA_VERSION};
use crate::core::slot::ComponentSlot;

/// Default catalog: (slot, name, mass in grams, extra attribute, description)
const DEFAULT_CATALOG: &[(ComponentSlot, &str, f64, Option<&str>, &str)] = &[
    (ComponentSlot::Frame, "DJI F450", 282.0, None, "Популярный квадрокоптер среднего размера"),
    (ComponentSlot::Frame, "DJI F550", 478.0, None, "Гексакоптер для тяжелой нагрузки"),
    (ComponentSlot::Frame, "Tarot 650", 520.0, None, "Складной карбоновый корпус"),
    (ComponentSlot::Frame, "ZMR250", 95.0, None, "Гоночный мини-квадрокоптер"),
    (ComponentSlot::Frame, "S500", 168.0, None, "Легкий корпус для FPV"),
    (ComponentSlot::Motor, "DJI E305", 56.0, None, "920KV бесколлекторный двигатель"),
    (ComponentSlot::Motor, "T-Motor MN2214", 52.0, None, "920KV для мультикоптеров"),
    (ComponentSlot::Motor, "EMAX RS2205", 28.0, None, "2300KV гоночный двигатель"),
    (ComponentSlot::Motor, "SunnySky X2212", 47.0, None, "980KV универсальный"),
    (ComponentSlot::Motor, "Cobra 2213", 64.0, None, "1050KV мощный двигатель"),
    (ComponentSlot::Battery, "Turnigy 3S 2200mAh", 185.0, Some("2200"), "11.1V LiPo батарея"),
    (ComponentSlot::Battery, "Tattu 4S 5200mAh", 458.0, Some("5200"), "14.8V высокая емкость"),
    (ComponentSlot::Battery, "ZOP 3S 1500mAh", 126.0, Some("1500"), "11.1V легкая батарея"),
    (ComponentSlot::Battery, "Gens Ace 4S 4000mAh", 368.0, Some("4000"), "14.8V для длительных полетов"),
    (ComponentSlot::Battery, "CNHL 6S 6000mAh", 682.0, Some("6000"), "22.2V профессиональная"),
    (ComponentSlot::FlightController, "DJI Naza-M V2", 60.0, None, "GPS стабилизация"),
    (ComponentSlot::FlightController, "Pixhawk 4", 38.0, None, "Открытый контроллер"),
    (ComponentSlot::FlightController, "Betaflight F4", 8.0, None, "Для гоночных дронов"),
    (ComponentSlot::FlightController, "APM 2.8", 45.0, None, "ArduPilot контроллер"),
    (ComponentSlot::FlightController, "Holybro Kakute F7", 6.0, None, "Компактный F7 чип"),
    (ComponentSlot::Propeller, "DJI 9450", 11.0, Some("9.4 inch"), "Самозатягивающиеся пропеллеры"),
    (ComponentSlot::Propeller, "Gemfan 5040", 4.0, Some("5 inch"), "Карбоновые лопасти"),
    (ComponentSlot::Propeller, "APC 10x4.7", 12.0, Some("10 inch"), "Медленные полеты"),
    (ComponentSlot::Propeller, "HQProp 6x4.5", 7.0, Some("6 inch"), "Трехлопастные"),
    (ComponentSlot::Propeller, "T-Motor 15x5", 28.0, Some("15 inch"), "Для больших дронов"),
    (ComponentSlot::Camera, "GoPro Hero 11", 154.0, None, "Экшн-камера 5.3K"),
    (ComponentSlot::Camera, "DJI Zenmuse X5S", 461.0, None, "Профессиональная камера"),
    (ComponentSlot::Camera, "RunCam Split 4", 15.0, None, "FPV камера с записью 4K"),
    (ComponentSlot::Camera, "Foxeer Predator", 8.0, None, "Легкая FPV камера"),
    (ComponentSlot::Camera, "Sony A6000 + объектив", 450.0, None, "Беззеркальная камера"),
];

impl Store {
    /// Create all tables
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        let mut sql = String::from(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );
            "#,
        );

        for slot in ComponentSlot::ALL {
            let extra = match slot {
                ComponentSlot::Battery => "capacity INTEGER,",
                ComponentSlot::Propeller => "size TEXT,",
                _ => "",
            };
            sql.push_str(&format!(
                r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                mass REAL NOT NULL,
                {extra}
                description TEXT
            );
            "#,
                table = slot.table_name(),
                extra = extra,
            ));
        }

        let mut slot_columns = String::new();
        for slot in ComponentSlot::ALL {
            let key = slot.as_str();
            slot_columns.push_str(&format!(
                "{key}_id INTEGER, {key}_name TEXT, {key}_mass REAL, {key}_qty INTEGER,\n",
                key = key
            ));
        }
        sql.push_str(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS calculations_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                {slot_columns}
                total_mass REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_timestamp ON calculations_history(timestamp);
            "#,
            slot_columns = slot_columns,
        ));

        let tx = self.conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        tx.commit()?;

        Ok(())
    }

    /// Populate the catalog with default components if every slot table is empty
    pub(super) fn seed_defaults(&mut self) -> Result<usize, StoreError> {
        for slot in ComponentSlot::ALL {
            let existing: i64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", slot.table_name()),
                [],
                |row| row.get(0),
            )?;
            if existing > 0 {
                return Ok(0);
            }
        }

        let tx = self.conn.transaction()?;
        for (slot, name, mass, extra, description) in DEFAULT_CATALOG {
            match slot.extra_column() {
                Some(column) => {
                    tx.execute(
                        &format!(
                            "INSERT INTO {} (name, mass, {}, description) VALUES (?1, ?2, ?3, ?4)",
                            slot.table_name(),
                            column
                        ),
                        params![name, mass, extra, description],
                    )?;
                }
                None => {
                    tx.execute(
                        &format!(
                            "INSERT INTO {} (name, mass, description) VALUES (?1, ?2, ?3)",
                            slot.table_name()
                        ),
                        params![name, mass, description],
                    )?;
                }
            }
        }
        tx.commit()?;

        tracing::info!(components = DEFAULT_CATALOG.len(), "seeded default component catalog");
        Ok(DEFAULT_CATALOG.len())
    }
}
