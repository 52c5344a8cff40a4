//! Minimal SVG drawing primitives shared by the charts

use std::fs;
use std::io;
use std::path::Path;

pub const WIDTH: f64 = 1000.0;
pub const HEIGHT: f64 = 600.0;

/// Colour cycle for data series
pub const PALETTE: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

/// Linear map from data space to pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        // A zero-width domain would divide by zero; widen it symmetrically
        let domain = if (domain.1 - domain.0).abs() < f64::EPSILON {
            (domain.0 - 1.0, domain.1 + 1.0)
        } else {
            domain
        };
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// Pixel rectangle holding the plotted data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn with_margins(width: f64, height: f64, margins: (f64, f64, f64, f64)) -> Self {
        let (top, right, bottom, left) = margins;
        Self {
            left,
            top,
            right: width - right,
            bottom: height - bottom,
        }
    }

    pub fn x_scale(&self, domain: (f64, f64)) -> Scale {
        Scale::new(domain, (self.left, self.right))
    }

    pub fn y_scale(&self, domain: (f64, f64)) -> Scale {
        Scale::new(domain, (self.bottom, self.top))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Line styling
#[derive(Debug, Clone, Copy)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub dashed: bool,
}

impl<'a> Stroke<'a> {
    pub fn solid(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }

    fn attrs(&self) -> String {
        let dash = if self.dashed {
            r#" stroke-dasharray="8,5""#
        } else {
            ""
        };
        format!(
            r#"stroke="{}" stroke-width="{:.1}"{}"#,
            self.color, self.width, dash
        )
    }
}

/// SVG document assembled element by element
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            width,
            height,
            body: String::new(),
        };
        doc.rect(0.0, 0.0, width, height, "#ffffff", 1.0);
        doc
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke<'_>) {
        self.body.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            stroke.attrs()
        ));
        self.body.push('\n');
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>) {
        if points.is_empty() {
            return;
        }
        self.body.push_str(&format!(
            r#"<polyline points="{}" fill="none" {}/>"#,
            format_points(points),
            stroke.attrs()
        ));
        self.body.push('\n');
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], fill: &str, opacity: f64) {
        if points.len() < 3 {
            return;
        }
        self.body.push_str(&format!(
            r#"<polygon points="{}" fill="{}" fill-opacity="{:.2}" stroke="none"/>"#,
            format_points(points),
            fill,
            opacity
        ));
        self.body.push('\n');
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.2}"/>"#,
            x,
            y,
            width.max(0.0),
            height.max(0.0),
            fill,
            opacity
        ));
        self.body.push('\n');
    }

    pub fn circle(&mut self, center: (f64, f64), radius: f64, fill: &str) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.1}" fill="{}"/>"#,
            center.0, center.1, radius, fill
        ));
        self.body.push('\n');
    }

    pub fn text(&mut self, pos: (f64, f64), content: &str, size: f64, anchor: Anchor, color: &str) {
        self.body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.0}" text-anchor="{}" fill="{}">{}</text>"#,
            pos.0,
            pos.1,
            size,
            anchor.as_str(),
            color,
            escape(content)
        ));
        self.body.push('\n');
    }

    /// Text rotated a quarter turn counter-clockwise, for y-axis labels
    pub fn vertical_text(&mut self, pos: (f64, f64), content: &str, size: f64, color: &str) {
        self.body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.0}" text-anchor="middle" fill="{}" transform="rotate(-90 {:.2} {:.2})">{}</text>"#,
            pos.0,
            pos.1,
            size,
            color,
            pos.0,
            pos.1,
            escape(content)
        ));
        self.body.push('\n');
    }

    pub fn title(&mut self, content: &str) {
        self.text((self.width / 2.0, 30.0), content, 18.0, Anchor::Middle, "#222222");
    }

    pub fn render(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.render())
    }
}

/// Plot area together with its data scales
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub area: PlotArea,
    pub x: Scale,
    pub y: Scale,
}

impl Axes {
    pub fn new(area: PlotArea, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            area,
            x: area.x_scale(x_domain),
            y: area.y_scale(y_domain),
        }
    }

    pub fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x.map(x), self.y.map(y))
    }
}

/// Axis frame, gridlines and tick labels
pub fn draw_axes(
    doc: &mut SvgDocument,
    axes: &Axes,
    x_ticks: &[f64],
    y_ticks: &[f64],
    x_label: impl Fn(f64) -> String,
    y_label: impl Fn(f64) -> String,
) {
    let grid = Stroke::dashed("#dddddd", 0.8);
    let axis = Stroke::solid("#444444", 1.0);
    let area = &axes.area;

    for &t in y_ticks {
        let py = axes.y.map(t);
        doc.line((area.left, py), (area.right, py), grid);
        doc.text((area.left - 8.0, py + 4.0), &y_label(t), 11.0, Anchor::End, "#444444");
    }
    for &t in x_ticks {
        let px = axes.x.map(t);
        doc.line((px, area.top), (px, area.bottom), grid);
        doc.text((px, area.bottom + 18.0), &x_label(t), 11.0, Anchor::Middle, "#444444");
    }
    doc.line((area.left, area.bottom), (area.right, area.bottom), axis);
    doc.line((area.left, area.top), (area.left, area.bottom), axis);
}

/// Legend entries stacked at the top-left of the plot area
pub fn draw_legend(doc: &mut SvgDocument, area: &PlotArea, entries: &[(&str, &str)]) {
    let x = area.left + 12.0;
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = area.top + 16.0 + i as f64 * 18.0;
        doc.rect(x, y - 9.0, 14.0, 10.0, color, 0.9);
        doc.text((x + 20.0, y), label, 12.0, Anchor::Start, "#222222");
    }
}

/// Round tick values spanning `[min, max]`, roughly `count` of them
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || count == 0 {
        return Vec::new();
    }
    let span = (max - min).abs();
    if span < f64::EPSILON {
        return vec![min];
    }
    let raw = span / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let start = (min.min(max) / step).ceil() * step;
    let end = min.max(max) + step * 1e-9;
    let mut ticks = Vec::new();
    let mut t = start;
    while t <= end {
        ticks.push(if t.abs() < step * 1e-9 { 0.0 } else { t });
        t += step;
    }
    ticks
}

/// Integer year ticks, thinned to at most `max_ticks`
pub fn year_ticks(first: i32, last: i32, max_ticks: usize) -> Vec<f64> {
    if last < first || max_ticks == 0 {
        return Vec::new();
    }
    let span = (last - first) as usize + 1;
    let step = span.div_ceil(max_ticks).max(1);
    let step = [1, 2, 5, 10, 20, 25, 50]
        .into_iter()
        .find(|s| *s >= step)
        .unwrap_or(step);
    let start = first + (step as i32 - first.rem_euclid(step as i32)) % step as i32;
    (start..=last)
        .step_by(step)
        .map(f64::from)
        .collect()
}

/// Min and max of the finite values, padded by `pad` of the span
pub fn padded_bounds(values: impl IntoIterator<Item = f64>, pad: f64) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let margin = (max - min) * pad;
    Some((min - margin, max + margin))
}

fn format_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_maps_endpoints() {
        let scale = Scale::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(scale.map(0.0), 100.0);
        assert_eq!(scale.map(10.0), 200.0);
        assert_eq!(scale.map(5.0), 150.0);

        let flat = Scale::new((3.0, 3.0), (0.0, 10.0));
        assert_eq!(flat.map(3.0), 5.0);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(-1.0, 1.0, 4), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 4).is_empty());
    }

    #[test]
    fn test_year_ticks() {
        assert_eq!(year_ticks(2000, 2004, 10), vec![2000.0, 2001.0, 2002.0, 2003.0, 2004.0]);
        assert_eq!(year_ticks(1965, 2023, 8), vec![1970.0, 1980.0, 1990.0, 2000.0, 2010.0, 2020.0]);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = SvgDocument::new(100.0, 100.0);
        doc.text((0.0, 0.0), "Coal & <Gas>", 10.0, Anchor::Start, "#000");
        let svg = doc.render();
        assert!(svg.contains("Coal &amp; &lt;Gas&gt;"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
