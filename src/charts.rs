//! Chart data preparation
//!
//! Owns the numbers and styling for the two proposal charts; actual
//! drawing happens behind the [`crate::render::ChartRenderer`] seam. The
//! generation figure resolved here is also what PRODU_MEDIA displays, so
//! the document text can never contradict the chart.

use crate::input::ClientInput;
use crate::money;
use crate::projection::Projection;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Month labels for the comparative chart.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Seasonal generation profile for a reference 1500 kWh/month system,
/// scaled linearly to the resolved figure.
const SEASONAL_PROFILE: [i64; 12] =
    [1500, 1450, 1600, 1550, 1400, 1300, 1350, 1500, 1600, 1650, 1500, 1450];
const SEASONAL_REFERENCE: Decimal = dec!(1500);

/// Generation figures below this are implausible for a grid-tied system
/// and trigger the kit-title fallback.
const GENERATION_SANITY_FLOOR: Decimal = dec!(100);
const FALLBACK_GENERATION: Decimal = dec!(1500);
const DEFAULT_CONSUMPTION: Decimal = dec!(1350);

pub const COMPARATIVE_TITLE: &str = "COMPARATIVO CONSUMO x GERAÇÃO";
pub const COMPARATIVE_AXIS_LABEL: &str = "Energia (kWh)";
pub const RETURN_TITLE: &str = "SEU RETORNO";

pub const CONSUMPTION_COLOR: &str = "#76b900";
pub const GENERATION_COLOR: &str = "#008EC4";
pub const NEGATIVE_COLOR: &str = "#dc3545";
pub const POSITIVE_COLOR: &str = "#28a745";

pub const COMPARATIVE_DPI: u32 = 150;
pub const COMPARATIVE_WIDTH_MM: u32 = 160;
pub const RETURN_DPI: u32 = 200;
pub const RETURN_WIDTH_MM: u32 = 180;

/// Series and styling for the monthly consumption x generation bars.
#[derive(Debug, Clone)]
pub struct ComparativeChart {
    pub months: [&'static str; 12],
    pub consumption: Vec<f64>,
    pub generation: Vec<f64>,
    pub consumption_color: &'static str,
    pub generation_color: &'static str,
    pub title: &'static str,
    pub axis_label: &'static str,
    pub dpi: u32,
    pub width_mm: u32,
}

/// Series and styling for the 25-bar cumulative return chart.
#[derive(Debug, Clone)]
pub struct ReturnChart {
    pub years: Vec<u32>,
    pub values: Vec<f64>,
    pub positive_color: &'static str,
    pub negative_color: &'static str,
    pub title: &'static str,
    pub y_min: f64,
    pub y_max: f64,
    pub dpi: u32,
    pub width_mm: u32,
}

impl ReturnChart {
    /// Bar color by sign. The zero line is always drawn regardless.
    pub fn bar_color(&self, value: f64) -> &'static str {
        if value < 0.0 {
            self.negative_color
        } else {
            self.positive_color
        }
    }
}

/// Resolve the monthly generation shared by the chart and the document:
/// the explicit figure when plausible, else a kWh quantity extracted from
/// the kit title, else the 1500 fallback.
pub fn resolve_monthly_generation(input: &ClientInput) -> Decimal {
    let explicit = money::resolve(input.producao_media.as_ref(), Decimal::ZERO);
    if explicit >= GENERATION_SANITY_FLOOR {
        return explicit;
    }
    if let Some(from_title) = input.especificacao_kit.as_deref().and_then(extract_kwh_from_title) {
        if from_title >= GENERATION_SANITY_FLOOR {
            log::debug!("monthly generation {} kWh recovered from kit title", from_title);
            return from_title;
        }
    }
    FALLBACK_GENERATION
}

/// Pull a kWh quantity out of a kit title: the first digit run (optional
/// dot thousands separators) directly followed by KWH or KMH, any case.
/// "Kit Solar 4.200 KWH Growatt" -> 4200.
pub fn extract_kwh_from_title(title: &str) -> Option<Decimal> {
    let pattern = Regex::new(r"(?i)(\d{1,3}(?:\.\d{3})+|\d+)\s*K[WM]H").ok()?;
    let captures = pattern.captures(title)?;
    captures.get(1)?.as_str().replace('.', "").parse().ok()
}

/// Prepare the consumption x generation series.
pub fn comparative_chart(input: &ClientInput) -> ComparativeChart {
    let consumption = money::resolve(input.consumo_medio.as_ref(), DEFAULT_CONSUMPTION);
    let generation = resolve_monthly_generation(input);

    let consumption_series = vec![consumption.to_f64().unwrap_or_default(); 12];
    let generation_series = SEASONAL_PROFILE
        .iter()
        .map(|base| {
            (generation * Decimal::from(*base) / SEASONAL_REFERENCE)
                .to_f64()
                .unwrap_or_default()
        })
        .collect();

    ComparativeChart {
        months: MONTH_LABELS,
        consumption: consumption_series,
        generation: generation_series,
        consumption_color: CONSUMPTION_COLOR,
        generation_color: GENERATION_COLOR,
        title: COMPARATIVE_TITLE,
        axis_label: COMPARATIVE_AXIS_LABEL,
        dpi: COMPARATIVE_DPI,
        width_mm: COMPARATIVE_WIDTH_MM,
    }
}

/// Prepare the 25-year return series. Values are the display-rounded
/// cumulative savings, so bars match the flow table figures.
pub fn return_chart(projection: &Projection) -> ReturnChart {
    let years: Vec<u32> = projection.years.iter().map(|y| y.year).collect();
    let values: Vec<f64> = projection
        .years
        .iter()
        .map(|y| y.cumulative_savings.round_dp(2).to_f64().unwrap_or_default())
        .collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Negative territory gets 20% headroom below; otherwise a fixed floor
    // keeps small positive charts from hugging the axis
    let y_min = if min < 0.0 { min * 1.2 } else { -10_000.0 };
    let y_max = max * 1.1;

    ReturnChart {
        years,
        values,
        positive_color: POSITIVE_COLOR,
        negative_color: NEGATIVE_COLOR,
        title: RETURN_TITLE,
        y_min,
        y_max,
        dpi: RETURN_DPI,
        width_mm: RETURN_WIDTH_MM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::RawNumber;
    use crate::projection::{project, MilestonePolicy, DEFAULT_INVESTMENT};
    use rust_decimal_macros::dec;

    #[test]
    fn extracts_kwh_from_kit_titles() {
        assert_eq!(extract_kwh_from_title("Kit Solar 4.200 KWH Growatt"), Some(dec!(4200)));
        assert_eq!(extract_kwh_from_title("KIT 1500KWH"), Some(dec!(1500)));
        assert_eq!(extract_kwh_from_title("kit 800 kmh premium"), Some(dec!(800)));
        assert_eq!(extract_kwh_from_title("Kit 1.500.000 KWH"), Some(dec!(1500000)));
    }

    #[test]
    fn ignores_titles_without_a_quantity() {
        assert_eq!(extract_kwh_from_title("Kit Premium c/ Monitoramento WiFi"), None);
        assert_eq!(extract_kwh_from_title(""), None);
        assert_eq!(extract_kwh_from_title("Kit 550W com 10 placas"), None);
    }

    #[test]
    fn explicit_generation_wins_when_plausible() {
        let input = ClientInput {
            producao_media: Some(RawNumber::Number(dec!(650))),
            especificacao_kit: Some("Kit 4.200 KWH".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_monthly_generation(&input), dec!(650));
    }

    #[test]
    fn implausible_generation_recovers_from_kit_title() {
        let input = ClientInput {
            producao_media: Some(RawNumber::Number(dec!(5))),
            especificacao_kit: Some("Kit Solar 4.200 KWH Growatt".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_monthly_generation(&input), dec!(4200));
    }

    #[test]
    fn missing_generation_and_title_fall_back_to_1500() {
        assert_eq!(resolve_monthly_generation(&ClientInput::default()), dec!(1500));

        let input = ClientInput {
            producao_media: Some(RawNumber::Number(dec!(50))),
            especificacao_kit: Some("Kit Premium".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_monthly_generation(&input), dec!(1500));
    }

    #[test]
    fn comparative_series_follow_the_seasonal_profile() {
        let chart = comparative_chart(&ClientInput::default());
        assert_eq!(chart.months[0], "Jan");
        assert_eq!(chart.months[11], "Dez");
        assert_eq!(chart.consumption, vec![1350.0; 12]);
        // Default generation equals the reference, so the profile passes
        // through unscaled
        let expected: Vec<f64> = SEASONAL_PROFILE.iter().map(|v| *v as f64).collect();
        assert_eq!(chart.generation, expected);
    }

    #[test]
    fn comparative_series_scale_linearly() {
        let input = ClientInput {
            producao_media: Some(RawNumber::Number(dec!(3000))),
            ..Default::default()
        };
        let chart = comparative_chart(&input);
        assert_eq!(chart.generation[0], 3000.0);
        assert_eq!(chart.generation[9], 3300.0);
    }

    #[test]
    fn return_chart_spans_all_years_with_fixed_floor() {
        let p = project(DEFAULT_INVESTMENT, &ClientInput::default(), MilestonePolicy::AsComputed);
        let chart = return_chart(&p);
        assert_eq!(chart.years.len(), 25);
        assert_eq!(chart.values.len(), 25);
        // Cumulative savings are positive from year 1, so the floor applies
        assert_eq!(chart.y_min, -10_000.0);
        assert!(chart.y_max > chart.values[24]);
        assert_eq!(chart.bar_color(chart.values[0]), POSITIVE_COLOR);
        assert_eq!(chart.bar_color(-1.0), NEGATIVE_COLOR);
    }

    #[test]
    fn negative_values_extend_the_axis_below() {
        // A negative savings figure drives the cumulative series negative
        let input = ClientInput {
            economia_mensal: Some(RawNumber::Text("-R$ 500,00".to_string())),
            ..Default::default()
        };
        let p = project(DEFAULT_INVESTMENT, &input, MilestonePolicy::AsComputed);
        let chart = return_chart(&p);
        let min = chart.values.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(min < 0.0);
        assert!((chart.y_min - min * 1.2).abs() < 1e-6);
        assert_eq!(chart.bar_color(chart.values[0]), NEGATIVE_COLOR);
    }

    #[test]
    fn styling_constants_are_wired_through() {
        let chart = comparative_chart(&ClientInput::default());
        assert_eq!(chart.consumption_color, "#76b900");
        assert_eq!(chart.generation_color, "#008EC4");
        assert_eq!(chart.title, "COMPARATIVO CONSUMO x GERAÇÃO");
        assert_eq!(chart.dpi, 150);
        assert_eq!(chart.width_mm, 160);

        let p = project(DEFAULT_INVESTMENT, &ClientInput::default(), MilestonePolicy::AsComputed);
        let chart = return_chart(&p);
        assert_eq!(chart.title, "SEU RETORNO");
        assert_eq!(chart.dpi, 200);
        assert_eq!(chart.width_mm, 180);
    }
}
