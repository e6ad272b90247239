//! Domain bounds for component masses and quantities
//!
//! Validation is a gate in front of the calculator: the calculator itself
//! trusts its input, so callers are expected to run these checks first and
//! decide whether a failure drops the offending slot or aborts the whole
//! calculation.

use thiserror::Error;

use crate::core::selection::Selection;
use crate::core::slot::ComponentSlot;

/// Largest accepted unit mass in grams (50 kg)
pub const MAX_MASS_GRAMS: f64 = 50_000.0;

/// Largest accepted quantity for a single slot
pub const MAX_QUANTITY: i64 = 100;

/// Validation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{message} (получено {value})")]
    OutOfRange {
        field: &'static str,
        value: String,
        message: &'static str,
    },
}

/// A validation failure tied to the slot it came from
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{slot}: {error}")]
pub struct SlotError {
    pub slot: ComponentSlot,
    #[source]
    pub error: ValidationError,
}

/// Check a unit mass in grams against `[0, 50000]`
pub fn validate_mass(value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "mass",
            value: value.to_string(),
            message: "Масса не может быть отрицательной",
        });
    }
    if value > MAX_MASS_GRAMS {
        return Err(ValidationError::OutOfRange {
            field: "mass",
            value: value.to_string(),
            message: "Масса слишком большая (максимум 50 кг)",
        });
    }
    Ok(())
}

/// Check a quantity against `[0, 100]`
pub fn validate_quantity(value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            value: value.to_string(),
            message: "Количество не может быть отрицательным",
        });
    }
    if value > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity",
            value: value.to_string(),
            message: "Количество слишком большое (максимум 100)",
        });
    }
    Ok(())
}

/// Validate every present slot, collecting one error per failing check
pub fn validate_selection(selection: &Selection) -> Vec<SlotError> {
    let mut errors = Vec::new();

    for (slot, component) in selection.iter() {
        if let Some(mass) = component.unit_mass {
            if let Err(error) = validate_mass(mass) {
                errors.push(SlotError { slot, error });
            }
        }
        if let Some(qty) = component.quantity {
            if let Err(error) = validate_quantity(i64::from(qty)) {
                errors.push(SlotError { slot, error });
            }
        }
    }

    errors
}
