//! Terminal bar chart of the mass distribution

use crate::core::MassDistribution;

const BAR_CHAR: char = '█';

/// Render one bar per distribution entry, scaled so that 100% fills `width`
pub fn render_distribution(distribution: &MassDistribution, width: usize) -> String {
    if distribution.is_empty() {
        return "Нет данных для отображения".to_string();
    }

    let total = distribution.total();
    let label_width = distribution
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(distribution.len());
    for (label, mass) in distribution.iter() {
        let pct = if total > 0.0 { mass / total * 100.0 } else { 0.0 };
        let bar_len = ((pct / 100.0) * width as f64).round() as usize;
        let padding = label_width - label.chars().count();
        lines.push(format!(
            "{}{}  {:<width$}  {:.1}% ({:.1}г)",
            label,
            " ".repeat(padding),
            BAR_CHAR.to_string().repeat(bar_len),
            pct,
            mass,
            width = width
        ));
    }

    lines.join("\n")
}
