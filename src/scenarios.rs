//! Investment comparison: solar vs savings account vs CDB
//!
//! Puts the projected solar return next to what the same money would earn
//! in a savings account (poupança) or a bank certificate (CDB). The solar
//! row echoes the projection milestones; the other two compound a uniform
//! monthly series at their documented rates.

use crate::money::format_brl;
use crate::projection::Milestones;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const SAVINGS_MONTHLY_RATE: Decimal = dec!(0.005);
const CDB_MONTHLY_RATE: Decimal = dec!(0.008);

/// Deposit fractions shown in the monthly column. Display only: the
/// original report compounded the full solar monthly figure for all
/// three instruments and only scaled the column shown to the reader.
const SAVINGS_DEPOSIT_FACTOR: Decimal = dec!(0.75);
const CDB_DEPOSIT_FACTOR: Decimal = dec!(1.02);

/// One row of the `rentabilidade` table.
///
/// Year values are duplicated under the alternate key convention
/// ("1ano", "5anos", ...) when the row enters the render context.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRow {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "investimento")]
    pub investment: String,
    #[serde(rename = "mensal")]
    pub monthly: String,
    #[serde(rename = "ano1")]
    pub year1: String,
    #[serde(rename = "ano5")]
    pub year5: String,
    #[serde(rename = "ano10")]
    pub year10: String,
    #[serde(rename = "ano25")]
    pub year25: String,
}

/// Alternate year-key spellings expected by older templates.
pub const SCENARIO_YEAR_ALIASES: &[(&str, &str)] = &[
    ("ano1", "1ano"),
    ("ano5", "5anos"),
    ("ano10", "10anos"),
    ("ano25", "25anos"),
];

/// Build the three-row comparison from the solar first-year monthly
/// savings. Always exactly three rows, in fixed order.
pub fn compare_scenarios(
    investment: Decimal,
    first_year_monthly: Decimal,
    milestones: &Milestones,
) -> Vec<ScenarioRow> {
    let investment_text = format_brl(investment);

    let savings = instrument_years(first_year_monthly, SAVINGS_MONTHLY_RATE);
    let cdb = instrument_years(first_year_monthly, CDB_MONTHLY_RATE);

    vec![
        ScenarioRow {
            kind: "Energia Solar".to_string(),
            investment: investment_text.clone(),
            monthly: format_brl(first_year_monthly),
            year1: format_brl(milestones.year1),
            year5: format_brl(milestones.year5),
            year10: format_brl(milestones.year10),
            year25: format_brl(milestones.year25),
        },
        ScenarioRow {
            kind: "Poupança".to_string(),
            investment: investment_text.clone(),
            monthly: format_brl(first_year_monthly * SAVINGS_DEPOSIT_FACTOR),
            year1: format_brl(savings.year1),
            year5: format_brl(savings.year5),
            year10: format_brl(savings.year10),
            year25: format_brl(savings.year25),
        },
        ScenarioRow {
            kind: "CDB".to_string(),
            investment: investment_text,
            monthly: format_brl(first_year_monthly * CDB_DEPOSIT_FACTOR),
            year1: format_brl(cdb.year1),
            year5: format_brl(cdb.year5),
            year10: format_brl(cdb.year10),
            year25: format_brl(cdb.year25),
        },
    ]
}

struct InstrumentYears {
    year1: Decimal,
    year5: Decimal,
    year10: Decimal,
    year25: Decimal,
}

/// Year 1 approximates six months of average compounding on the annual
/// total; later years treat that figure as the payment of a uniform
/// monthly series.
fn instrument_years(monthly: Decimal, rate: Decimal) -> InstrumentYears {
    let year1 = monthly * dec!(12) * compound(rate, 6);
    InstrumentYears {
        year1,
        year5: future_value(year1, rate, 60),
        year10: future_value(year1, rate, 120),
        year25: future_value(year1, rate, 300),
    }
}

/// (1 + rate)^months by repeated multiplication, staying in decimal.
fn compound(rate: Decimal, months: u32) -> Decimal {
    let base = Decimal::ONE + rate;
    let mut acc = Decimal::ONE;
    for _ in 0..months {
        acc *= base;
    }
    acc
}

/// Future value of a uniform series: payment * ((1+r)^n - 1) / r.
fn future_value(payment: Decimal, rate: Decimal, months: u32) -> Decimal {
    payment * (compound(rate, months) - Decimal::ONE) / rate
}
