//! Component slots - the six fixed roles of a drone configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A component role in a drone configuration
///
/// Variant order is the canonical display order used by reports and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSlot {
    Frame,
    Motor,
    Battery,
    FlightController,
    Propeller,
    Camera,
}

impl ComponentSlot {
    /// All slots in canonical order
    pub const ALL: [ComponentSlot; 6] = [
        ComponentSlot::Frame,
        ComponentSlot::Motor,
        ComponentSlot::Battery,
        ComponentSlot::FlightController,
        ComponentSlot::Propeller,
        ComponentSlot::Camera,
    ];

    /// Snake-case key, also the column prefix in the history table
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentSlot::Frame => "frame",
            ComponentSlot::Motor => "motor",
            ComponentSlot::Battery => "battery",
            ComponentSlot::FlightController => "flight_controller",
            ComponentSlot::Propeller => "propeller",
            ComponentSlot::Camera => "camera",
        }
    }

    /// Catalog table holding components for this slot
    pub fn table_name(&self) -> &'static str {
        match self {
            ComponentSlot::Frame => "frames",
            ComponentSlot::Motor => "motors",
            ComponentSlot::Battery => "batteries",
            ComponentSlot::FlightController => "flight_controllers",
            ComponentSlot::Propeller => "propellers",
            ComponentSlot::Camera => "cameras",
        }
    }

    /// Title used in report sections
    pub fn title(&self) -> &'static str {
        match self {
            ComponentSlot::Frame => "Корпус",
            ComponentSlot::Motor => "Двигатели",
            ComponentSlot::Battery => "Аккумулятор",
            ComponentSlot::FlightController => "Контроллер полета",
            ComponentSlot::Propeller => "Пропеллеры",
            ComponentSlot::Camera => "Камера/Полезная нагрузка",
        }
    }

    /// Name of the slot-specific catalog column, if the slot has one
    pub fn extra_column(&self) -> Option<&'static str> {
        match self {
            ComponentSlot::Battery => Some("capacity"),
            ComponentSlot::Propeller => Some("size"),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "frame" | "frames" => Ok(ComponentSlot::Frame),
            "motor" | "motors" => Ok(ComponentSlot::Motor),
            "battery" | "batteries" => Ok(ComponentSlot::Battery),
            "flight_controller" | "flight_controllers" | "fc" => {
                Ok(ComponentSlot::FlightController)
            }
            "propeller" | "propellers" | "prop" => Ok(ComponentSlot::Propeller),
            "camera" | "cameras" | "payload" => Ok(ComponentSlot::Camera),
            _ => Err(format!(
                "Unknown component slot '{}'. Expected one of: frame, motor, battery, flight_controller, propeller, camera",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![
            ComponentSlot::Camera,
            ComponentSlot::Frame,
            ComponentSlot::Propeller,
            ComponentSlot::Motor,
            ComponentSlot::FlightController,
            ComponentSlot::Battery,
        ];
        shuffled.sort();
        assert_eq!(shuffled, ComponentSlot::ALL.to_vec());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("fc".parse::<ComponentSlot>().unwrap(), ComponentSlot::FlightController);
        assert_eq!(
            "flight-controller".parse::<ComponentSlot>().unwrap(),
            ComponentSlot::FlightController
        );
        assert_eq!("Motors".parse::<ComponentSlot>().unwrap(), ComponentSlot::Motor);
        assert!("rotor".parse::<ComponentSlot>().is_err());
    }

    #[test]
    fn test_roundtrip_through_str() {
        for slot in ComponentSlot::ALL {
            assert_eq!(slot.as_str().parse::<ComponentSlot>().unwrap(), slot);
            assert_eq!(slot.table_name().parse::<ComponentSlot>().unwrap(), slot);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ComponentSlot::FlightController).unwrap();
        assert_eq!(json, "\"flight_controller\"");
    }
}
