//! Text report generation
//!
//! Renders a [`CalculationResult`] into a plain-text document with a fixed
//! section layout:
//!
//! 1. Header banner with generation time (and calculation ID if known)
//! 2. Configuration breakdown in canonical slot order
//! 3. Totals
//! 4. Weight category
//! 5. Percentage distribution
//! 6. Recommendations
//! 7. Footer banner
//!
//! Section titles and line labels are stable so that callers can search the
//! output for them.

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::calc::{CalculationResult, WeightCategory};
use crate::core::slot::ComponentSlot;

const RULE_WIDTH: usize = 70;

pub const REPORT_TITLE: &str = "ОТЧЕТ О МАССЕ БЕСПИЛОТНОГО ЛЕТАТЕЛЬНОГО АППАРАТА (БПЛА)";
pub const SECTION_CONFIGURATION: &str = "СОСТАВ КОНФИГУРАЦИИ:";
pub const SECTION_TOTALS: &str = "ИТОГОВЫЕ ДАННЫЕ:";
pub const SECTION_DISTRIBUTION: &str = "ПРОЦЕНТНОЕ РАСПРЕДЕЛЕНИЕ МАССЫ:";
pub const SECTION_RECOMMENDATIONS: &str = "РЕКОМЕНДАЦИИ:";
pub const REPORT_END: &str = "КОНЕЦ ОТЧЕТА";

/// Report file errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders calculation results as text
#[derive(Debug, Clone)]
pub struct Reporter {
    generated_at: NaiveDateTime,
    calculation_id: Option<i64>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Reporter stamped with the current local time
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Reporter stamped with a fixed time
    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            calculation_id: None,
        }
    }

    /// Include the history ID of the calculation in the header
    pub fn with_calculation_id(mut self, id: i64) -> Self {
        self.calculation_id = Some(id);
        self
    }

    /// Render the full report
    pub fn render(&self, result: &CalculationResult) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("=".repeat(RULE_WIDTH));
        lines.push(REPORT_TITLE.to_string());
        lines.push("=".repeat(RULE_WIDTH));
        lines.push(String::new());

        lines.push(format!(
            "Дата и время: {}",
            self.generated_at.format("%d.%m.%Y %H:%M:%S")
        ));
        if let Some(id) = self.calculation_id {
            lines.push(format!("ID конфигурации: {}", id));
        }
        lines.push(String::new());

        push_section(&mut lines, SECTION_CONFIGURATION);
        for (slot, component) in &result.per_component {
            lines.push(format!("{}:", slot.title()));
            lines.push(format!("  Модель: {}", component.name));
            lines.push(format!("  Масса единицы: {:.1} г", component.unit_mass));
            lines.push(format!("  Количество: {} шт.", component.quantity));
            lines.push(format!("  Общая масса: {:.1} г", component.total_mass));
            lines.push(String::new());
        }

        push_section(&mut lines, SECTION_TOTALS);
        lines.push(format!(
            "Количество типов компонентов: {}",
            result.component_count
        ));
        lines.push(format!(
            "Общая масса БПЛА: {:.1} г ({:.3} кг)",
            result.total_mass,
            result.total_mass / 1000.0
        ));
        lines.push(String::new());

        lines.push(format!("Категория БПЛА: {}", result.category().label()));
        lines.push(String::new());

        push_section(&mut lines, SECTION_DISTRIBUTION);
        for slot in result.per_component.keys() {
            lines.push(format!("{}: {:.1}%", slot.title(), result.share_of(*slot)));
        }
        lines.push(String::new());

        push_section(&mut lines, SECTION_RECOMMENDATIONS);
        for recommendation in Self::recommendations(result) {
            lines.push(format!("• {}", recommendation));
        }
        lines.push(String::new());

        lines.push("=".repeat(RULE_WIDTH));
        lines.push(REPORT_END.to_string());
        lines.push("=".repeat(RULE_WIDTH));

        lines.join("\n")
    }

    /// Advisory notes derived from total mass, battery share and motor count
    pub fn recommendations(result: &CalculationResult) -> Vec<String> {
        let mut notes: Vec<&str> = Vec::new();

        match result.category() {
            WeightCategory::Micro => {
                notes.push("Дрон не требует регистрации в большинстве стран");
                notes.push("Подходит для использования в помещениях и городских условиях");
            }
            WeightCategory::Mini => {
                notes.push("Легкий дрон, хорошая маневренность");
                notes.push("Рекомендуется для любительской съемки и FPV полетов");
            }
            WeightCategory::Medium => {
                notes.push("Средний дрон, баланс между грузоподъемностью и маневренностью");
                notes.push("Подходит для профессиональной фото/видеосъемки");
            }
            WeightCategory::Large | WeightCategory::Heavy => {
                notes.push("Тяжелый дрон, высокая грузоподъемность");
                notes.push("Требуется регистрация и получение разрешений");
                notes.push("Рекомендуется для промышленного применения");
                if result.category() == WeightCategory::Heavy {
                    notes.push("Масса свыше 25 кг - требуется специальное разрешение на полеты");
                }
            }
        }

        if result.per_component.contains_key(&ComponentSlot::Battery) {
            let share = result.share_of(ComponentSlot::Battery);
            if share < 20.0 {
                notes.push("Низкая доля аккумулятора - возможно короткое время полета");
            } else if share > 40.0 {
                notes.push(
                    "Высокая доля аккумулятора - хорошее время полета, но снижена маневренность",
                );
            }
        }

        // Airframe remarks only make sense once a frame is chosen.
        if result.per_component.contains_key(&ComponentSlot::Frame) {
            if let Some(motor) = result.per_component.get(&ComponentSlot::Motor) {
                match motor.quantity {
                    4 => notes.push("Квадрокоптер - оптимальная конфигурация для большинства задач"),
                    6 => notes.push("Гексакоптер - повышенная надежность и грузоподъемность"),
                    8 => notes.push("Октокоптер - максимальная надежность и стабильность"),
                    _ => {}
                }
            }
        }

        notes.into_iter().map(String::from).collect()
    }
}

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(title.to_string());
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(String::new());
}

/// Default report file name for a generation time
pub fn default_report_filename(at: NaiveDateTime) -> String {
    format!("drone_report_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

/// Write report text into `dir`, returning the path written
pub fn save_report(text: &str, dir: &Path, filename: Option<&str>) -> Result<PathBuf, ReportError> {
    let name = filename
        .map(String::from)
        .unwrap_or_else(|| default_report_filename(Local::now().naive_local()));
    let path = dir.join(name);

    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
    }
    fs::write(&path, text).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "report written");
    Ok(path)
}
