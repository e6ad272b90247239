//! Core module - mass calculation, validation, reporting and storage

pub mod calc;
pub mod config;
pub mod report;
pub mod selection;
pub mod slot;
pub mod store;
pub mod validate;

pub use calc::{
    calculate_component_mass, classify, compute, distribution, format_mass, CalcError,
    CalculationResult, ComponentTotal, MassDistribution, WeightCategory,
};
pub use config::Config;
pub use report::{save_report, ReportError, Reporter};
pub use selection::{ComponentSelection, Selection};
pub use slot::ComponentSlot;
pub use store::{CatalogComponent, HistoryRecord, NewComponent, Store, StoreError};
pub use validate::{validate_mass, validate_quantity, validate_selection, SlotError, ValidationError};
