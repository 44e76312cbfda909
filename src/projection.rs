//! 25-year cash-flow projection
//!
//! The financial heart of a proposal: year by year, savings grow with
//! energy inflation while the payback balance climbs out of the initial
//! investment hole. All arithmetic is exact decimal; rounding happens only
//! at the display boundary.

use crate::input::ClientInput;
use crate::money::{self, format_brl, format_kwh};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Annual energy inflation applied to both the tariff and the savings.
const INFLATION: Decimal = dec!(1.05);
/// Grid minimum: the bill never drops below this with the system on.
const MINIMUM_BILL: Decimal = dec!(100);
/// Yearly growth of the banked-credit factor.
const CREDIT_GROWTH: Decimal = dec!(0.01);

pub const DEFAULT_INVESTMENT: Decimal = dec!(25000);
const DEFAULT_TARIFF: Decimal = dec!(0.92);
const DEFAULT_MONTHLY_SAVINGS: Decimal = dec!(1142);
const DEFAULT_MONTHLY_GENERATION: Decimal = dec!(1500);
const DEFAULT_MONTHLY_CONSUMPTION: Decimal = dec!(1350);

pub const PROJECTION_YEARS: u32 = 25;

/// How milestone columns appear on individual projection rows.
///
/// The original report filled each milestone only once the loop reached
/// that year, so early rows carry a placeholder. `Backfilled` instead
/// stamps every row with all four final values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MilestonePolicy {
    #[default]
    AsComputed,
    Backfilled,
}

/// Milestone cumulative savings known at a given row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneSnapshot {
    pub year1: Option<Decimal>,
    pub year5: Option<Decimal>,
    pub year10: Option<Decimal>,
    pub year25: Option<Decimal>,
}

/// Final milestone values; always fully populated since the projection
/// always runs the full 25 years.
#[derive(Debug, Clone, Copy)]
pub struct Milestones {
    pub year1: Decimal,
    pub year5: Decimal,
    pub year10: Decimal,
    pub year25: Decimal,
}

/// One projected year, numeric form.
#[derive(Debug, Clone)]
pub struct ProjectionYear {
    pub year: u32,
    pub tariff: Decimal,
    pub generation_kwh: Decimal,
    pub consumption_kwh: Decimal,
    pub banked_credit_kwh: Decimal,
    pub bill_without_system: Decimal,
    pub bill_with_system: Decimal,
    pub yearly_savings: Decimal,
    pub monthly_savings: Decimal,
    pub cumulative_savings: Decimal,
    /// Running balance: starts at -investment, turns positive at payback.
    pub payback_balance: Decimal,
    pub investment: Decimal,
    pub milestones: MilestoneSnapshot,
}

/// Result of [`project`]: 25 rows plus the final milestone values.
#[derive(Debug, Clone)]
pub struct Projection {
    pub years: Vec<ProjectionYear>,
    pub milestones: Milestones,
}

impl Projection {
    /// Formatted rows for the `fluxo` template table.
    pub fn rows(&self) -> Vec<ProjectionRow> {
        self.years.iter().map(ProjectionRow::from).collect()
    }

    /// First-year monthly savings exactly as displayed, reparsed.
    ///
    /// The comparison table builds on the formatted figure so its numbers
    /// match the flow table in the rendered document.
    pub fn first_year_monthly(&self) -> Decimal {
        let formatted = self
            .years
            .first()
            .map(|y| format_brl(y.monthly_savings))
            .unwrap_or_default();
        money::parse_brl(&formatted).unwrap_or_default()
    }
}

/// Run the 25-year projection. Missing or malformed inputs fall back to
/// the documented defaults, so this never fails.
pub fn project(investment: Decimal, input: &ClientInput, policy: MilestonePolicy) -> Projection {
    let base_tariff = money::resolve(input.tarifa.as_ref(), DEFAULT_TARIFF);
    let monthly_savings = money::resolve(input.economia_mensal.as_ref(), DEFAULT_MONTHLY_SAVINGS);
    let monthly_generation =
        money::resolve(input.producao_media.as_ref(), DEFAULT_MONTHLY_GENERATION);
    let monthly_consumption =
        money::resolve(input.consumo_medio.as_ref(), DEFAULT_MONTHLY_CONSUMPTION);

    log::debug!(
        "projecting {} years: investment={} tariff={} monthly_savings={}",
        PROJECTION_YEARS,
        investment,
        base_tariff,
        monthly_savings
    );

    let annual_generation = monthly_generation * dec!(12);
    let annual_consumption = monthly_consumption * dec!(12);

    let mut years = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut snapshot = MilestoneSnapshot::default();
    let mut balance = -investment;
    let mut inflation = Decimal::ONE;

    for year in 1..=PROJECTION_YEARS {
        if year > 1 {
            inflation *= INFLATION;
        }
        let yearly_savings = monthly_savings * dec!(12) * inflation;
        balance += yearly_savings;
        let cumulative_savings = balance + investment;

        let tariff = base_tariff * inflation;
        let credit_factor = Decimal::ONE + Decimal::from(year) * CREDIT_GROWTH;
        let banked_credit =
            ((annual_generation - annual_consumption) * credit_factor).max(Decimal::ZERO);

        match year {
            1 => snapshot.year1 = Some(cumulative_savings),
            5 => snapshot.year5 = Some(cumulative_savings),
            10 => snapshot.year10 = Some(cumulative_savings),
            25 => snapshot.year25 = Some(cumulative_savings),
            _ => {}
        }

        years.push(ProjectionYear {
            year,
            tariff,
            generation_kwh: annual_generation,
            consumption_kwh: annual_consumption,
            banked_credit_kwh: banked_credit,
            bill_without_system: annual_consumption * tariff,
            bill_with_system: MINIMUM_BILL,
            yearly_savings,
            monthly_savings: yearly_savings / dec!(12),
            cumulative_savings,
            payback_balance: balance,
            investment,
            milestones: snapshot,
        });
    }

    let milestones = Milestones {
        year1: snapshot.year1.unwrap_or_default(),
        year5: snapshot.year5.unwrap_or_default(),
        year10: snapshot.year10.unwrap_or_default(),
        year25: snapshot.year25.unwrap_or_default(),
    };

    if policy == MilestonePolicy::Backfilled {
        for row in &mut years {
            row.milestones = snapshot;
        }
    }

    log::debug!(
        "projection complete: final balance {}, cumulative savings {}",
        balance,
        milestones.year25
    );

    Projection { years, milestones }
}

/// Placeholder shown in milestone columns before that year is reached.
const MILESTONE_PLACEHOLDER: &str = "R$ 0,00";

/// One formatted row of the `fluxo` table, keyed by template tag names.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionRow {
    #[serde(rename = "ano")]
    pub year: String,
    #[serde(rename = "tar")]
    pub tariff: String,
    /// Fio B wire charge; not modelled, always "0,00"
    #[serde(rename = "tar_fb")]
    pub tariff_fio_b: String,
    #[serde(rename = "en_g")]
    pub generation_kwh: String,
    #[serde(rename = "en_cons")]
    pub consumption_kwh: String,
    #[serde(rename = "cred_ac")]
    pub banked_credit_kwh: String,
    #[serde(rename = "fat_s_sol")]
    pub bill_without_system: String,
    #[serde(rename = "fat_c_sol")]
    pub bill_with_system: String,
    #[serde(rename = "eco")]
    pub savings: String,
    #[serde(rename = "eco_ac")]
    pub cumulative_savings: String,
    pub payback: String,
    #[serde(rename = "inves")]
    pub investment: String,
    #[serde(rename = "mensal")]
    pub monthly_savings: String,
    #[serde(rename = "anoa")]
    pub milestone_year1: String,
    #[serde(rename = "anob")]
    pub milestone_year5: String,
    #[serde(rename = "anoc")]
    pub milestone_year10: String,
    #[serde(rename = "anod")]
    pub milestone_year25: String,
}

impl From<&ProjectionYear> for ProjectionRow {
    fn from(y: &ProjectionYear) -> Self {
        let milestone = |value: Option<Decimal>| match value {
            Some(v) => format_brl(v),
            None => MILESTONE_PLACEHOLDER.to_string(),
        };
        ProjectionRow {
            year: y.year.to_string(),
            tariff: format!("{:.2}", y.tariff.round_dp(2)).replace('.', ","),
            tariff_fio_b: "0,00".to_string(),
            generation_kwh: format_kwh(y.generation_kwh),
            consumption_kwh: format_kwh(y.consumption_kwh),
            banked_credit_kwh: format_kwh(y.banked_credit_kwh),
            bill_without_system: format_brl(y.bill_without_system),
            bill_with_system: format_brl(y.bill_with_system),
            savings: format_brl(y.yearly_savings),
            cumulative_savings: format_brl(y.cumulative_savings),
            payback: payback_text(y.payback_balance),
            investment: format_brl(y.investment),
            monthly_savings: format_brl(y.monthly_savings),
            milestone_year1: milestone(y.milestones.year1),
            milestone_year5: milestone(y.milestones.year5),
            milestone_year10: milestone(y.milestones.year10),
            milestone_year25: milestone(y.milestones.year25),
        }
    }
}

/// Payback stays in the negative form until the balance actually turns
/// positive, so a zero balance still reads "-R$ 0,00".
fn payback_text(balance: Decimal) -> String {
    if balance > Decimal::ZERO {
        format_brl(balance)
    } else {
        format!("-{}", format_brl(-balance))
    }
}
