//! Mass aggregation - per-component totals, grand total and weight category
//!
//! The calculator is a pure function over a [`Selection`]. It performs no
//! bounds checking of its own; run [`crate::core::validate`] first.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::core::selection::Selection;
use crate::core::slot::ComponentSlot;

/// Name shown for a selected component that carries no model name
pub const UNNAMED_COMPONENT: &str = "Не выбран";

/// Calculation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("No component selected: choose at least one component with a mass")]
    EmptySelection,
}

/// Mass breakdown for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTotal {
    pub name: String,
    pub unit_mass: f64,
    pub quantity: u32,
    pub total_mass: f64,
}

/// Result of one mass calculation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Breakdown for every slot that had a component with a mass
    pub per_component: BTreeMap<ComponentSlot, ComponentTotal>,

    /// Sum of all component totals in grams
    pub total_mass: f64,

    /// Number of slots that contributed (not number of units)
    pub component_count: usize,
}

impl CalculationResult {
    /// Reject degenerate results that nobody should persist or report on
    pub fn ensure_reportable(&self) -> Result<(), CalcError> {
        if self.component_count == 0 {
            Err(CalcError::EmptySelection)
        } else {
            Ok(())
        }
    }

    /// Percentage of the total mass contributed by a slot (0 when total is 0)
    pub fn share_of(&self, slot: ComponentSlot) -> f64 {
        match self.per_component.get(&slot) {
            Some(component) if self.total_mass > 0.0 => {
                component.total_mass / self.total_mass * 100.0
            }
            _ => 0.0,
        }
    }

    /// Weight category of the total mass
    pub fn category(&self) -> WeightCategory {
        classify(self.total_mass)
    }
}

/// Weight bands over total mass in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightCategory {
    /// Below 250 g
    Micro,
    /// 250 g up to 500 g
    Mini,
    /// 500 g up to 2 kg
    Medium,
    /// 2 kg up to 25 kg
    Large,
    /// 25 kg and above
    Heavy,
}

impl WeightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightCategory::Micro => "micro",
            WeightCategory::Mini => "mini",
            WeightCategory::Medium => "medium",
            WeightCategory::Large => "large",
            WeightCategory::Heavy => "heavy",
        }
    }

    /// Label printed in reports
    pub fn label(&self) -> &'static str {
        match self {
            WeightCategory::Micro => "Микро (< 250г) - не требует регистрации",
            WeightCategory::Mini => "Мини (250-500г)",
            WeightCategory::Medium => "Средний (0.5-2 кг)",
            WeightCategory::Large => "Большой (2-25 кг)",
            WeightCategory::Heavy => "Тяжелый (> 25 кг) - требуется специальное разрешение",
        }
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label -> mass mapping used for charts
///
/// Keeps insertion order. Inserting an existing label replaces its mass in
/// place, so two components with the same display label collapse into one
/// entry holding the later mass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MassDistribution {
    entries: Vec<(String, f64)>,
}

impl MassDistribution {
    pub fn insert(&mut self, label: String, mass: f64) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = mass,
            None => self.entries.push((label, mass)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, mass)| *mass)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, mass)| (label.as_str(), *mass))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entries
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, mass)| mass).sum()
    }
}

impl Serialize for MassDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, mass) in &self.entries {
            map.serialize_entry(label, mass)?;
        }
        map.end()
    }
}

/// Total mass of `quantity` units of `unit_mass` grams
pub fn calculate_component_mass(unit_mass: f64, quantity: u32) -> f64 {
    unit_mass * f64::from(quantity)
}

/// Compute the per-component breakdown and grand total of a selection
pub fn compute(selection: &Selection) -> CalculationResult {
    let mut result = CalculationResult::default();

    for (slot, component) in selection.iter() {
        let Some(unit_mass) = component.unit_mass else {
            continue;
        };
        let quantity = component.effective_quantity();
        let total = calculate_component_mass(unit_mass, quantity);

        result.per_component.insert(
            slot,
            ComponentTotal {
                name: component
                    .name
                    .clone()
                    .unwrap_or_else(|| UNNAMED_COMPONENT.to_string()),
                unit_mass,
                quantity,
                total_mass: total,
            },
        );
        result.total_mass += total;
        result.component_count += 1;
    }

    result
}

/// Build the chart mapping for a selection
pub fn distribution(selection: &Selection) -> MassDistribution {
    let mut distribution = MassDistribution::default();

    for (slot, component) in selection.iter() {
        let Some(unit_mass) = component.unit_mass else {
            continue;
        };
        let quantity = component.effective_quantity();
        let name = component
            .name
            .clone()
            .unwrap_or_else(|| slot.as_str().to_string());

        let label = if quantity > 1 {
            format!("{} (x{})", name, quantity)
        } else {
            name
        };

        distribution.insert(label, calculate_component_mass(unit_mass, quantity));
    }

    distribution
}

/// Classify a total mass in grams
pub fn classify(total_mass: f64) -> WeightCategory {
    if total_mass < 250.0 {
        WeightCategory::Micro
    } else if total_mass < 500.0 {
        WeightCategory::Mini
    } else if total_mass < 2000.0 {
        WeightCategory::Medium
    } else if total_mass < 25000.0 {
        WeightCategory::Large
    } else {
        WeightCategory::Heavy
    }
}

/// Format a mass in grams for display
///
/// Masses of a kilogram or more are shown in kilograms with the gram value
/// in parentheses.
pub fn format_mass(total_mass: f64) -> String {
    if total_mass >= 1000.0 {
        format!("{:.2} кг ({:.1} г)", total_mass / 1000.0, total_mass)
    } else {
        format!("{:.1} г", total_mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::ComponentSelection;

    fn frame_and_motors() -> Selection {
        Selection::new()
            .with(ComponentSlot::Frame, ComponentSelection::new("Test Frame", 100.0, 1))
            .with(ComponentSlot::Motor, ComponentSelection::new("Test Motor", 50.0, 4))
    }

    #[test]
    fn test_component_mass_is_product() {
        assert_eq!(calculate_component_mass(50.0, 4), 200.0);
        assert_eq!(calculate_component_mass(0.1, 3), 0.1 * 3.0);
        assert_eq!(calculate_component_mass(12.5, 0), 0.0);
    }

    #[test]
    fn test_compute_frame_and_motors() {
        let result = compute(&frame_and_motors());

        assert_eq!(result.total_mass, 300.0);
        assert_eq!(result.component_count, 2);
        assert_eq!(result.category(), WeightCategory::Mini);

        let motor = &result.per_component[&ComponentSlot::Motor];
        assert_eq!(motor.name, "Test Motor");
        assert_eq!(motor.quantity, 4);
        assert_eq!(motor.total_mass, 200.0);
    }

    #[test]
    fn test_total_equals_sum_of_components() {
        let selection = Selection::new()
            .with(ComponentSlot::Frame, ComponentSelection::new("F450", 282.3, 1))
            .with(ComponentSlot::Motor, ComponentSelection::new("E305", 56.7, 4))
            .with(ComponentSlot::Battery, ComponentSelection::new("3S", 185.1, 1))
            .with(ComponentSlot::FlightController, ComponentSelection::new("Pixhawk", 38.0, 1))
            .with(ComponentSlot::Propeller, ComponentSelection::new("9450", 11.3, 4))
            .with(ComponentSlot::Camera, ComponentSelection::new("GoPro", 154.0, 1));

        let result = compute(&selection);
        let sum: f64 = result.per_component.values().map(|c| c.total_mass).sum();
        assert_eq!(result.total_mass, sum);
        assert_eq!(result.component_count, 6);
    }

    #[test]
    fn test_compute_skips_missing_mass() {
        let selection = frame_and_motors().with(
            ComponentSlot::Camera,
            ComponentSelection {
                name: Some("No mass".to_string()),
                ..Default::default()
            },
        );

        let result = compute(&selection);
        assert_eq!(result.component_count, 2);
        assert!(!result.per_component.contains_key(&ComponentSlot::Camera));
    }

    #[test]
    fn test_compute_defaults() {
        let selection = Selection::new().with(
            ComponentSlot::Battery,
            ComponentSelection {
                unit_mass: Some(185.0),
                ..Default::default()
            },
        );

        let result = compute(&selection);
        let battery = &result.per_component[&ComponentSlot::Battery];
        assert_eq!(battery.name, UNNAMED_COMPONENT);
        assert_eq!(battery.quantity, 1);
        assert_eq!(result.total_mass, 185.0);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let selection = frame_and_motors();
        let first = compute(&selection);
        let second = compute(&selection);
        assert_eq!(first, second);
        assert_eq!(first.total_mass.to_bits(), second.total_mass.to_bits());
    }

    #[test]
    fn test_empty_selection() {
        let result = compute(&Selection::new());
        assert_eq!(result.total_mass, 0.0);
        assert_eq!(result.component_count, 0);
        assert!(result.per_component.is_empty());
        assert_eq!(result.ensure_reportable(), Err(CalcError::EmptySelection));
        assert!(distribution(&Selection::new()).is_empty());
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.0), WeightCategory::Micro);
        assert_eq!(classify(249.9), WeightCategory::Micro);
        assert_eq!(classify(250.0), WeightCategory::Mini);
        assert_eq!(classify(499.9), WeightCategory::Mini);
        assert_eq!(classify(500.0), WeightCategory::Medium);
        assert_eq!(classify(1999.9), WeightCategory::Medium);
        assert_eq!(classify(2000.0), WeightCategory::Large);
        assert_eq!(classify(24999.9), WeightCategory::Large);
        assert_eq!(classify(25000.0), WeightCategory::Heavy);
        assert_eq!(classify(25000.0).as_str(), "heavy");
    }

    #[test]
    fn test_format_mass() {
        assert_eq!(format_mass(999.9), "999.9 г");
        assert_eq!(format_mass(1500.0), "1.50 кг (1500.0 г)");
        assert_eq!(format_mass(1000.0), "1.00 кг (1000.0 г)");
        assert_eq!(format_mass(0.0), "0.0 г");
    }

    #[test]
    fn test_distribution_labels() {
        let dist = distribution(&frame_and_motors());
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.get("Test Frame"), Some(100.0));
        assert_eq!(dist.get("Test Motor (x4)"), Some(200.0));
        assert_eq!(dist.total(), compute(&frame_and_motors()).total_mass);
    }

    #[test]
    fn test_distribution_falls_back_to_slot_key() {
        let selection = Selection::new().with(
            ComponentSlot::FlightController,
            ComponentSelection {
                unit_mass: Some(8.0),
                ..Default::default()
            },
        );
        assert_eq!(distribution(&selection).get("flight_controller"), Some(8.0));
    }

    #[test]
    fn test_distribution_label_collision_overwrites() {
        let selection = Selection::new()
            .with(ComponentSlot::Frame, ComponentSelection::new("Generic", 100.0, 1))
            .with(ComponentSlot::Motor, ComponentSelection::new("Other", 20.0, 1))
            .with(ComponentSlot::Camera, ComponentSelection::new("Generic", 40.0, 1));

        let dist = distribution(&selection);
        let labels: Vec<_> = dist.iter().map(|(label, _)| label.to_string()).collect();
        assert_eq!(labels, vec!["Generic", "Other"]);
        assert_eq!(dist.get("Generic"), Some(40.0));

        // The breakdown itself keeps both slots.
        assert_eq!(compute(&selection).component_count, 3);
    }

    #[test]
    fn test_share_of_guards_zero_total() {
        let selection =
            Selection::new().with(ComponentSlot::Frame, ComponentSelection::new("Empty", 0.0, 1));
        let result = compute(&selection);
        assert_eq!(result.share_of(ComponentSlot::Frame), 0.0);
        assert_eq!(result.share_of(ComponentSlot::Motor), 0.0);
    }

    #[test]
    fn test_result_serializes_slot_keys() {
        let json = serde_json::to_value(compute(&frame_and_motors())).unwrap();
        assert_eq!(json["per_component"]["motor"]["total_mass"], 200.0);
        assert_eq!(json["component_count"], 2);
    }

    #[test]
    fn test_independent_calculations_in_parallel() {
        use crate::core::report::Reporter;

        let at = chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let selections: Vec<Selection> = (1..=8u32)
            .map(|n| {
                Selection::new()
                    .with(ComponentSlot::Frame, ComponentSelection::new("Frame", 100.0 * n as f64, 1))
                    .with(ComponentSlot::Motor, ComponentSelection::new("Motor", 50.0, n))
            })
            .collect();

        let parallel: Vec<(CalculationResult, String)> = std::thread::scope(|scope| {
            let handles: Vec<_> = selections
                .iter()
                .map(|selection| {
                    scope.spawn(move || {
                        let result = compute(selection);
                        let text = Reporter::at(at).render(&result);
                        (result, text)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (selection, (result, text)) in selections.iter().zip(&parallel) {
            let expected = compute(selection);
            assert_eq!(result, &expected);
            assert_eq!(text, &Reporter::at(at).render(&expected));
        }
        assert_eq!(parallel[0].0.total_mass, 150.0);
        assert_eq!(parallel[7].0.total_mass, 1200.0);
    }
}
