//! SVG chart renderer
//!
//! Hand-built markup, no drawing dependency: bars, gridlines, labels and a
//! legend are enough for both proposal charts. Output is a standalone SVG
//! document; hosts that need raster images plug a different renderer into
//! the [`ChartRenderer`] seam.

use super::{ChartImage, ChartRenderer, RenderError};
use crate::charts::{ComparativeChart, ReturnChart};
use std::fmt::Write;

const MEDIA_TYPE: &str = "image/svg+xml";

const CANVAS_W: f64 = 960.0;
const CANVAS_H: f64 = 430.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 52.0;
const MARGIN_BOTTOM: f64 = 56.0;

#[derive(Debug, Default)]
pub struct SvgCharts;

impl ChartRenderer for SvgCharts {
    fn comparative(&self, chart: &ComparativeChart) -> Result<ChartImage, RenderError> {
        let svg = comparative_svg(chart).map_err(|e| RenderError::Failed(e.to_string()))?;
        Ok(ChartImage {
            bytes: svg.into_bytes(),
            media_type: MEDIA_TYPE,
            width_mm: chart.width_mm,
            dpi: chart.dpi,
        })
    }

    fn payback(&self, chart: &ReturnChart) -> Result<ChartImage, RenderError> {
        let svg = payback_svg(chart).map_err(|e| RenderError::Failed(e.to_string()))?;
        Ok(ChartImage {
            bytes: svg.into_bytes(),
            media_type: MEDIA_TYPE,
            width_mm: chart.width_mm,
            dpi: chart.dpi,
        })
    }
}

struct Plot {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    y_min: f64,
    y_max: f64,
}

impl Plot {
    fn new(y_min: f64, y_max: f64) -> Plot {
        // Degenerate ranges still need a drawable span
        let y_max = if y_max > y_min { y_max } else { y_min + 1.0 };
        Plot {
            left: MARGIN_LEFT,
            right: CANVAS_W - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: CANVAS_H - MARGIN_BOTTOM,
            y_min,
            y_max,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical pixel position of a data value.
    fn y(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        self.bottom - (value - self.y_min) / span * (self.bottom - self.top)
    }
}

fn svg_open(out: &mut String) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="Helvetica, Arial, sans-serif">"#,
        CANVAS_W, CANVAS_H, CANVAS_W, CANVAS_H
    )?;
    writeln!(out, r#"<rect width="{}" height="{}" fill="white"/>"#, CANVAS_W, CANVAS_H)
}

fn title(out: &mut String, text: &str) -> std::fmt::Result {
    writeln!(
        out,
        r#"<text x="{}" y="30" font-size="18" font-weight="bold" text-anchor="middle">{}</text>"#,
        CANVAS_W / 2.0,
        text
    )
}

fn gridlines(out: &mut String, plot: &Plot) -> std::fmt::Result {
    for step in 0..=4 {
        let value = plot.y_min + (plot.y_max - plot.y_min) * step as f64 / 4.0;
        let y = plot.y(value);
        writeln!(
            out,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#ddd" stroke-dasharray="4 3"/>"##,
            plot.left, y, plot.right, y
        )?;
        writeln!(
            out,
            r##"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end" fill="#555">{:.0}</text>"##,
            plot.left - 8.0,
            y + 4.0,
            value
        )?;
    }
    Ok(())
}

fn comparative_svg(chart: &ComparativeChart) -> Result<String, std::fmt::Error> {
    let peak = chart
        .consumption
        .iter()
        .chain(chart.generation.iter())
        .copied()
        .fold(0.0_f64, f64::max);
    let plot = Plot::new(0.0, peak * 1.15);

    let mut out = String::new();
    svg_open(&mut out)?;
    title(&mut out, chart.title)?;
    gridlines(&mut out, &plot)?;

    // Axis label, rotated along the left edge
    writeln!(
        out,
        r#"<text x="18" y="{:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 18 {:.1})">{}</text>"#,
        (plot.top + plot.bottom) / 2.0,
        (plot.top + plot.bottom) / 2.0,
        chart.axis_label
    )?;

    let group_w = plot.width() / chart.months.len() as f64;
    let bar_w = group_w * 0.32;
    for (i, month) in chart.months.iter().enumerate() {
        let group_x = plot.left + i as f64 * group_w;
        let consumption = chart.consumption.get(i).copied().unwrap_or_default();
        let generation = chart.generation.get(i).copied().unwrap_or_default();

        let x1 = group_x + group_w / 2.0 - bar_w - 1.0;
        let x2 = group_x + group_w / 2.0 + 1.0;
        bar(&mut out, x1, bar_w, consumption, &plot, chart.consumption_color)?;
        bar(&mut out, x2, bar_w, generation, &plot, chart.generation_color)?;

        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
            group_x + group_w / 2.0,
            plot.bottom + 16.0,
            month
        )?;
    }

    // Baseline and legend
    writeln!(
        out,
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333"/>"##,
        plot.left, plot.bottom, plot.right, plot.bottom
    )?;
    legend(&mut out, plot.right - 220.0, &[
        (chart.consumption_color, "Consumo"),
        (chart.generation_color, "Geração"),
    ])?;

    out.push_str("</svg>\n");
    Ok(out)
}

fn payback_svg(chart: &ReturnChart) -> Result<String, std::fmt::Error> {
    let plot = Plot::new(chart.y_min, chart.y_max);

    let mut out = String::new();
    svg_open(&mut out)?;
    title(&mut out, chart.title)?;
    gridlines(&mut out, &plot)?;

    let count = chart.years.len().max(1);
    let slot_w = plot.width() / count as f64;
    let bar_w = slot_w * 0.7;
    let zero_y = plot.y(0.0);

    for (i, year) in chart.years.iter().enumerate() {
        let value = chart.values.get(i).copied().unwrap_or_default();
        let x = plot.left + i as f64 * slot_w + (slot_w - bar_w) / 2.0;
        let value_y = plot.y(value);
        let (top, height) = if value >= 0.0 {
            (value_y, zero_y - value_y)
        } else {
            (zero_y, value_y - zero_y)
        };
        writeln!(
            out,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x,
            top,
            bar_w,
            height.max(0.5),
            chart.bar_color(value)
        )?;
        writeln!(
            out,
            r##"<text x="{:.1}" y="{:.1}" font-size="9" text-anchor="middle" fill="#555">{}</text>"##,
            x + bar_w / 2.0,
            plot.bottom + 14.0,
            year
        )?;
    }

    // The zero line is always drawn
    writeln!(
        out,
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333"/>"##,
        plot.left, zero_y, plot.right, zero_y
    )?;

    out.push_str("</svg>\n");
    Ok(out)
}

fn bar(
    out: &mut String,
    x: f64,
    width: f64,
    value: f64,
    plot: &Plot,
    color: &str,
) -> std::fmt::Result {
    let y = plot.y(value.max(0.0));
    let height = (plot.bottom - y).max(0.0);
    writeln!(
        out,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
        x, y, width, height, color
    )
}

fn legend(out: &mut String, x: f64, entries: &[(&str, &str)]) -> std::fmt::Result {
    for (i, (color, label)) in entries.iter().enumerate() {
        let entry_x = x + i as f64 * 110.0;
        writeln!(
            out,
            r#"<rect x="{:.1}" y="40" width="12" height="12" fill="{}"/>"#,
            entry_x, color
        )?;
        writeln!(
            out,
            r#"<text x="{:.1}" y="50" font-size="12">{}</text>"#,
            entry_x + 16.0,
            label
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{comparative_chart, return_chart};
    use crate::input::ClientInput;
    use crate::projection::{project, MilestonePolicy, DEFAULT_INVESTMENT};

    #[test]
    fn comparative_svg_contains_series_and_styling() {
        let chart = comparative_chart(&ClientInput::default());
        let image = SvgCharts.comparative(&chart).unwrap();
        assert_eq!(image.media_type, "image/svg+xml");
        assert_eq!(image.dpi, 150);
        assert_eq!(image.width_mm, 160);

        let svg = String::from_utf8(image.bytes).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("COMPARATIVO CONSUMO x GERAÇÃO"));
        assert!(svg.contains("#76b900"));
        assert!(svg.contains("#008EC4"));
        assert!(svg.contains(">Jan<"));
        assert!(svg.contains(">Dez<"));
        // 12 months, two bars each, plus legend swatches and background
        assert_eq!(svg.matches("<rect").count(), 12 * 2 + 2 + 1);
    }

    #[test]
    fn payback_svg_draws_all_years_and_the_zero_line() {
        let p = project(DEFAULT_INVESTMENT, &ClientInput::default(), MilestonePolicy::AsComputed);
        let chart = return_chart(&p);
        let image = SvgCharts.payback(&chart).unwrap();
        assert_eq!(image.dpi, 200);
        assert_eq!(image.width_mm, 180);

        let svg = String::from_utf8(image.bytes).unwrap();
        assert!(svg.contains("SEU RETORNO"));
        // 25 bars plus the background rect
        assert_eq!(svg.matches("<rect").count(), 25 + 1);
        // Positive cumulative savings all through
        assert!(svg.contains("#28a745"));
        assert!(!svg.contains("#dc3545"));
    }
}
