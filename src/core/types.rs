use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    Accumulation,
    Decumulation,
}

/// Validated calculator inputs. Rates are fractions (0.01, not 1.0); the
/// percent-to-fraction conversion happens at the API boundary.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub portfolio_value: f64,
    pub annual_fee_rate: f64,
    pub growth_rate: f64,
    pub years: u32,
    pub mode: Mode,
    pub annual_spending: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPoint {
    pub year: u32,
    pub percent_fee_portfolio: f64,
    pub flat_fee_portfolio: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub points: Vec<YearPoint>,
    pub annual_fee_dollars: f64,
    pub first_year_savings: f64,
    pub total_savings: f64,
    pub spending_power_years: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

/// One-year split of gross growth between the advisory fee and what the
/// investor keeps.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthBreakdown {
    pub annual_return: f64,
    pub lost_to_fees: f64,
    pub net_profit: f64,
}

/// Closed-form future values backing the "how we calculated this" card.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureValueDetail {
    pub percent_fee_fv: f64,
    pub flat_fee_fv: f64,
    pub total_savings: f64,
}
