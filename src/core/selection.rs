//! Component selections - what the user picked for each slot

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::slot::ComponentSlot;
use crate::core::validate::validate_quantity;

/// A concrete component chosen for one slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentSelection {
    /// Catalog ID, when the component came from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Component model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Mass of a single unit in grams
    #[serde(default, alias = "mass")]
    pub unit_mass: Option<f64>,

    /// Number of units (1 when omitted)
    #[serde(
        default,
        alias = "qty",
        deserialize_with = "quantity_in_range",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<u32>,
}

/// Read a quantity as a signed integer so out-of-range values carry the
/// validator's message instead of a bare type error
fn quantity_in_range<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(qty) = Option::<i64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    validate_quantity(qty).map_err(serde::de::Error::custom)?;
    u32::try_from(qty)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

impl ComponentSelection {
    /// Create a selection with a name, unit mass and quantity
    pub fn new(name: impl Into<String>, unit_mass: f64, quantity: u32) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            unit_mass: Some(unit_mass),
            quantity: Some(quantity),
        }
    }

    /// Attach the catalog ID this selection was built from
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Quantity with the default of one unit applied
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

/// The set of components chosen for one calculation
///
/// One optional field per slot; an absent slot contributes no mass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<ComponentSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motor: Option<ComponentSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<ComponentSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_controller: Option<ComponentSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propeller: Option<ComponentSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<ComponentSelection>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the selection for a slot
    pub fn get(&self, slot: ComponentSlot) -> Option<&ComponentSelection> {
        match slot {
            ComponentSlot::Frame => self.frame.as_ref(),
            ComponentSlot::Motor => self.motor.as_ref(),
            ComponentSlot::Battery => self.battery.as_ref(),
            ComponentSlot::FlightController => self.flight_controller.as_ref(),
            ComponentSlot::Propeller => self.propeller.as_ref(),
            ComponentSlot::Camera => self.camera.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ComponentSlot) -> &mut Option<ComponentSelection> {
        match slot {
            ComponentSlot::Frame => &mut self.frame,
            ComponentSlot::Motor => &mut self.motor,
            ComponentSlot::Battery => &mut self.battery,
            ComponentSlot::FlightController => &mut self.flight_controller,
            ComponentSlot::Propeller => &mut self.propeller,
            ComponentSlot::Camera => &mut self.camera,
        }
    }

    /// Set (or replace) the selection for a slot
    pub fn set(&mut self, slot: ComponentSlot, component: ComponentSelection) {
        *self.slot_mut(slot) = Some(component);
    }

    /// Builder-style variant of [`Selection::set`]
    pub fn with(mut self, slot: ComponentSlot, component: ComponentSelection) -> Self {
        self.set(slot, component);
        self
    }

    /// Copy of this selection with one slot cleared
    pub fn without(&self, slot: ComponentSlot) -> Self {
        let mut copy = self.clone();
        *copy.slot_mut(slot) = None;
        copy
    }

    /// Present slots in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ComponentSlot, &ComponentSelection)> {
        ComponentSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|c| (slot, c)))
    }

    /// True when no slot has a selection
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
