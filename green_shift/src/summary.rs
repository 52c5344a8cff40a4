//! Plain-text scenario comparison

use crate::simulator::ScenarioOutcome;
use crate::Result;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

impl fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.baseline;
        writeln!(f, "Green Shift Scenario Comparison")?;
        writeln!(f)?;
        writeln!(f, "Baseline Gas Forecast: {:.1} TWh", b.mean_gas)?;
        writeln!(f, "Baseline Emissions: {:.1} Mt CO₂", b.emissions)?;
        writeln!(f, "Baseline Intensity: {:.3} Mt/TWh", b.intensity)?;
        writeln!(f, "Baseline Cost: {}", format_currency(b.cost))?;
        writeln!(f, "Baseline CO₂ Tax: {}", format_currency(b.tax))?;
        writeln!(f)?;
        writeln!(f, "Scenario Comparisons:")?;
        for s in &self.scenarios {
            writeln!(
                f,
                "{:>2}% shift → Δ Emissions: {:+.1} Mt CO₂, Δ Intensity: {:+.3}, Savings: {}, Tax Δ: {}",
                s.shift_pct,
                s.delta_emissions,
                s.delta_intensity,
                format_currency(s.savings),
                format_currency(s.tax_delta),
            )?;
        }
        Ok(())
    }
}

/// Baseline block followed by one line per shift level
pub fn render_summary(outcome: &ScenarioOutcome) -> String {
    outcome.to_string()
}

/// Write [`render_summary`] output to `path`
pub fn write_summary<P: AsRef<Path>>(outcome: &ScenarioOutcome, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_summary(outcome))?;
    info!(path = %path.display(), "saved scenario summary");
    Ok(())
}

/// Whole dollars with thousands separators, sign after the symbol: `$-1,234`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}
