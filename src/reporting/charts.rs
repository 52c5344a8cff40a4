//! Forecast, fuel-mix, scenario and lag-diagnostic charts

use super::svg::{
    draw_axes, draw_legend, nice_ticks, padded_bounds, year_ticks, Anchor, Axes, PlotArea,
    Stroke, SvgDocument, HEIGHT, PALETTE, WIDTH,
};
use crate::error::{PipelineError, Result};
use energy_data::{Measure, PivotTable};
use energy_math::{acf, pacf, Correlogram};
use gas_forecast::ForecastTable;
use green_shift::ScenarioMatrix;
use tracing::warn;

/// Lags shown in the diagnostics panels, before capping by series length
pub const DIAGNOSTIC_LAGS: usize = 24;

const FORECAST_COLOR: &str = "#d62728";

fn fuel_label(measure: Measure) -> &'static str {
    measure.header().trim_end_matches(" (TWh)")
}

/// Coal, gas and renewables history with the dashed gas forecast and its band
pub fn energy_forecast_chart(
    pivot: &PivotTable,
    forecast: &ForecastTable,
    country: &str,
) -> Result<SvgDocument> {
    let (first, last) = match (pivot.first_year(), pivot.latest_year()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PipelineError::Report("no history to plot".to_string())),
    };
    let history = Measure::FUELS
        .iter()
        .map(|m| Ok((*m, pivot.column(*m)?)))
        .collect::<Result<Vec<_>>>()?;
    let records = forecast.records();
    let end = records.iter().map(|r| r.year).max().unwrap_or(last).max(last);

    let values = history
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, v)| *v))
        .chain(records.iter().flat_map(|r| [r.ci_lower, r.ci_upper]));
    let (lo, hi) = padded_bounds(values, 0.05).unwrap_or((0.0, 1.0));

    let area = PlotArea::with_margins(WIDTH, HEIGHT, (60.0, 40.0, 60.0, 90.0));
    let axes = Axes::new(area, (first as f64, end as f64), (lo.min(0.0), hi));

    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.title(&format!(
        "{} Energy Consumption by Source ({}-yr Gas Forecast + CI)",
        country,
        records.len()
    ));
    draw_axes(
        &mut doc,
        &axes,
        &year_ticks(first, end, 12),
        &nice_ticks(lo.min(0.0), hi, 6),
        |t| format!("{:.0}", t),
        |t| format!("{:.0}", t),
    );

    if !records.is_empty() {
        let mut band: Vec<(f64, f64)> = records
            .iter()
            .map(|r| axes.point(r.year as f64, r.ci_upper))
            .collect();
        band.extend(records.iter().rev().map(|r| axes.point(r.year as f64, r.ci_lower)));
        doc.polygon(&band, FORECAST_COLOR, 0.15);
    }

    for (i, (_, points)) in history.iter().enumerate() {
        let line: Vec<(f64, f64)> = points
            .iter()
            .map(|(year, v)| axes.point(*year as f64, *v))
            .collect();
        doc.polyline(&line, Stroke::solid(PALETTE[i], 2.0));
    }

    let forecast_line: Vec<(f64, f64)> = records
        .iter()
        .map(|r| axes.point(r.year as f64, r.gas_forecast_twh))
        .collect();
    doc.polyline(&forecast_line, Stroke::dashed(FORECAST_COLOR, 2.5));

    let mut legend: Vec<(&str, &str)> = history
        .iter()
        .enumerate()
        .map(|(i, (m, _))| (fuel_label(*m), PALETTE[i]))
        .collect();
    legend.push(("Gas Forecast", FORECAST_COLOR));
    legend.push(("95% CI", "#f4b6b7"));
    draw_legend(&mut doc, &area, &legend);

    doc.text((WIDTH / 2.0, HEIGHT - 15.0), "Year", 13.0, Anchor::Middle, "#222222");
    doc.vertical_text((25.0, (area.top + area.bottom) / 2.0), "TWh", 13.0, "#222222");
    Ok(doc)
}

/// Stacked percentage share of coal, gas and renewables per year
pub fn fuel_mix_chart(pivot: &PivotTable, country: &str) -> Result<SvgDocument> {
    let columns = Measure::FUELS
        .iter()
        .map(|m| pivot.column(*m))
        .collect::<energy_data::Result<Vec<_>>>()?;

    // (year, share per fuel); years with no consumption have no defined mix
    let shares: Vec<(i32, Vec<f64>)> = pivot
        .years()
        .into_iter()
        .enumerate()
        .filter_map(|(row, year)| {
            let values: Vec<f64> = columns.iter().map(|c| c[row].1).collect();
            let total: f64 = values.iter().sum();
            (total > 0.0).then(|| (year, values.iter().map(|v| v / total * 100.0).collect()))
        })
        .collect();

    let (first, last) = match (shares.first(), shares.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => return Err(PipelineError::Report("no fuel mix to plot".to_string())),
    };

    let area = PlotArea::with_margins(WIDTH, HEIGHT, (60.0, 40.0, 60.0, 90.0));
    let axes = Axes::new(area, (first as f64, last as f64), (0.0, 100.0));

    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.title(&format!(
        "{} Electricity Mix (% Share of Coal, Gas, Renewables)",
        country
    ));

    let mut baseline = vec![0.0; shares.len()];
    for (layer, color) in PALETTE.iter().take(Measure::FUELS.len()).enumerate() {
        let top: Vec<f64> = shares
            .iter()
            .zip(&baseline)
            .map(|((_, s), base)| base + s[layer])
            .collect();
        let mut polygon: Vec<(f64, f64)> = shares
            .iter()
            .zip(&top)
            .map(|((year, _), y)| axes.point(*year as f64, *y))
            .collect();
        polygon.extend(
            shares
                .iter()
                .zip(&baseline)
                .rev()
                .map(|((year, _), y)| axes.point(*year as f64, *y)),
        );
        doc.polygon(&polygon, color, 0.8);
        baseline = top;
    }

    draw_axes(
        &mut doc,
        &axes,
        &year_ticks(first, last, 12),
        &nice_ticks(0.0, 100.0, 5),
        |t| format!("{:.0}", t),
        |t| format!("{:.0}", t),
    );
    let legend: Vec<(&str, &str)> = Measure::FUELS
        .iter()
        .enumerate()
        .map(|(i, m)| (fuel_label(*m), PALETTE[i]))
        .collect();
    draw_legend(&mut doc, &area, &legend);

    doc.text((WIDTH / 2.0, HEIGHT - 15.0), "Year", 13.0, Anchor::Middle, "#222222");
    doc.vertical_text((25.0, (area.top + area.bottom) / 2.0), "Share (%)", 13.0, "#222222");
    Ok(doc)
}

/// Δ emissions bars on the left axis, cost and tax lines on the right axis
pub fn scenario_chart(matrix: &ScenarioMatrix) -> Result<SvgDocument> {
    let rows = matrix.rows();
    if rows.is_empty() {
        return Err(PipelineError::Report("no scenarios to plot".to_string()));
    }

    let area = PlotArea::with_margins(WIDTH, HEIGHT, (70.0, 100.0, 60.0, 100.0));
    let n = rows.len() as f64;
    let x_domain = (-0.5, n - 0.5);

    let (d_lo, d_hi) = padded_bounds(
        rows.iter().map(|r| r.delta_emissions).chain([0.0]),
        0.1,
    )
    .unwrap_or((-1.0, 1.0));
    let (c_lo, c_hi) = padded_bounds(
        rows.iter()
            .flat_map(|r| [r.energy_cost, r.co2_tax_exposure])
            .chain([0.0]),
        0.1,
    )
    .unwrap_or((0.0, 1.0));
    let left = Axes::new(area, x_domain, (d_lo, d_hi));
    let right = Axes::new(area, x_domain, (c_lo, c_hi));

    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    doc.title("Green Shift Scenario Outcomes");

    let categories: Vec<f64> = (0..rows.len()).map(|i| i as f64).collect();
    draw_axes(
        &mut doc,
        &left,
        &categories,
        &nice_ticks(d_lo, d_hi, 6),
        |t| {
            rows.get(t.round() as usize)
                .map(|r| format!("{}%", r.shift_pct))
                .unwrap_or_default()
        },
        |t| format!("{:.1}", t),
    );

    let bar_color = "#2ca02c";
    let band = (area.right - area.left) / n;
    let zero = left.y.map(0.0);
    for (i, row) in rows.iter().enumerate() {
        let x = left.x.map(i as f64) - band * 0.3;
        let y = left.y.map(row.delta_emissions);
        doc.rect(x, y.min(zero), band * 0.6, (y - zero).abs(), bar_color, 0.6);
    }

    // Right-hand axis
    doc.line(
        (area.right, area.top),
        (area.right, area.bottom),
        Stroke::solid("#444444", 1.0),
    );
    for t in nice_ticks(c_lo, c_hi, 6) {
        let py = right.y.map(t);
        doc.text(
            (area.right + 8.0, py + 4.0),
            &format!("{:.0}", t),
            11.0,
            Anchor::Start,
            "#444444",
        );
    }

    let series = [
        ("Energy Cost ($)", "#1f77b4", rows.iter().map(|r| r.energy_cost).collect::<Vec<_>>()),
        ("CO₂ Tax Exposure ($)", "#d62728", rows.iter().map(|r| r.co2_tax_exposure).collect()),
    ];
    for (_, color, values) in &series {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| right.point(i as f64, *v))
            .collect();
        doc.polyline(&points, Stroke::solid(color, 2.0));
        for p in &points {
            doc.circle(*p, 4.0, color);
        }
    }

    draw_legend(
        &mut doc,
        &area,
        &[
            ("Δ Emissions (Mt CO₂)", bar_color),
            (series[0].0, series[0].1),
            (series[1].0, series[1].1),
        ],
    );
    doc.text((WIDTH / 2.0, HEIGHT - 15.0), "Green Shift Scenario", 13.0, Anchor::Middle, "#222222");
    doc.vertical_text(
        (30.0, (area.top + area.bottom) / 2.0),
        "Emissions Reduction (Mt CO₂)",
        13.0,
        bar_color,
    );
    doc.vertical_text((WIDTH - 25.0, (area.top + area.bottom) / 2.0), "Cost ($)", 13.0, "#222222");
    Ok(doc)
}

/// ACF and PACF panels for one series, lags capped by its length
///
/// A constant series has no defined autocorrelation; its panels are drawn
/// without coefficients.
pub fn diagnostics_chart(values: &[f64], name: &str) -> Result<SvgDocument> {
    let n = values.len();
    let acf_lags = DIAGNOSTIC_LAGS.min(n.saturating_sub(1));
    let pacf_lags = DIAGNOSTIC_LAGS.min((n / 2).saturating_sub(1));
    let (correlations, partial) = if n >= 2 && is_constant(values) {
        warn!(series = name, "constant series, autocorrelation undefined");
        let band = 1.96 / (n as f64).sqrt();
        (undefined(acf_lags, band), undefined(pacf_lags, band))
    } else {
        (acf(values, acf_lags)?, pacf(values, pacf_lags)?)
    };

    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    let half = HEIGHT / 2.0;
    let top = PlotArea {
        left: 70.0,
        top: 40.0,
        right: WIDTH - 30.0,
        bottom: half - 30.0,
    };
    let bottom = PlotArea {
        left: 70.0,
        top: half + 40.0,
        right: WIDTH - 30.0,
        bottom: HEIGHT - 30.0,
    };

    draw_correlogram(&mut doc, &top, &correlations, &format!("{} - ACF", name));
    draw_correlogram(&mut doc, &bottom, &partial, &format!("{} - PACF", name));
    Ok(doc)
}

fn is_constant(values: &[f64]) -> bool {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() < f64::EPSILON
}

fn undefined(max_lag: usize, confidence_band: f64) -> Correlogram {
    Correlogram {
        values: vec![f64::NAN; max_lag + 1],
        confidence_band,
    }
}

fn draw_correlogram(
    doc: &mut SvgDocument,
    area: &PlotArea,
    correlogram: &Correlogram,
    title: &str,
) {
    let max_lag = correlogram.max_lag();
    let axes = Axes::new(*area, (-0.5, max_lag as f64 + 0.5), (-1.1, 1.1));
    let color = PALETTE[0];

    doc.text(
        ((area.left + area.right) / 2.0, area.top - 12.0),
        title,
        15.0,
        Anchor::Middle,
        "#222222",
    );

    let band = correlogram.confidence_band.min(1.1);
    let (x0, y0) = axes.point(-0.5, band);
    let (x1, y1) = axes.point(max_lag as f64 + 0.5, -band);
    doc.rect(x0, y0, x1 - x0, y1 - y0, color, 0.15);

    let lag_ticks: Vec<f64> = (0..=max_lag)
        .step_by(if max_lag > 12 { 2 } else { 1 })
        .map(|l| l as f64)
        .collect();
    draw_axes(
        doc,
        &axes,
        &lag_ticks,
        &[-1.0, -0.5, 0.0, 0.5, 1.0],
        |t| format!("{:.0}", t),
        |t| format!("{:.1}", t),
    );

    if correlogram.values.iter().all(|v| !v.is_finite()) {
        doc.text(
            ((area.left + area.right) / 2.0, (area.top + area.bottom) / 2.0),
            "undefined for a constant series",
            13.0,
            Anchor::Middle,
            "#444444",
        );
    }

    for (lag, value) in correlogram.values.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let base = axes.point(lag as f64, 0.0);
        let tip = axes.point(lag as f64, *value);
        doc.line(base, tip, Stroke::solid(color, 1.5));
        doc.circle(tip, 3.5, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_for_trending_series() {
        let values: Vec<f64> = (0..20)
            .map(|i| 100.0 + 3.0 * i as f64 + (i % 3) as f64)
            .collect();
        let svg = diagnostics_chart(&values, "Gas").unwrap().render();
        assert!(svg.contains("Gas - ACF"));
        assert!(svg.contains("Gas - PACF"));
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_diagnostics_for_constant_series() {
        let svg = diagnostics_chart(&[5000.0; 20], "Gas").unwrap().render();
        assert!(svg.contains("undefined for a constant series"));
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_diagnostics_too_short_series_fails() {
        assert!(diagnostics_chart(&[1.0], "Gas").is_err());
    }
}
