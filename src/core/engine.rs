use super::types::{FutureValueDetail, GrowthBreakdown, Inputs, Mode, ProjectionResult, YearPoint};

/// The flat advisory fee being marketed: $100/month, charged annually.
pub const FLAT_ANNUAL_FEE: f64 = 1200.0;

/// Projects both fee regimes year by year.
///
/// The percent-fee portfolio compounds at `growth - fee`; the flat-fee
/// portfolio compounds at the full growth rate and pays a constant $1,200.
/// In decumulation mode both portfolios additionally pay the annual spending
/// draw, are rounded to whole dollars, and clamp at zero. The rounding
/// happens before the next year compounds, matching the published
/// calculator's arithmetic.
///
/// Total over its input domain: no failure modes, no hidden state. Input
/// validation lives at the API boundary.
pub fn project(inputs: &Inputs) -> ProjectionResult {
    let pv = inputs.portfolio_value;
    let growth = inputs.growth_rate;
    let fee = inputs.annual_fee_rate;
    let spend = inputs.annual_spending;

    let mut points = Vec::new();
    if pv > 0.0 && inputs.years > 0 {
        points.reserve(inputs.years as usize + 1);
        // Year-0 anchor: both portfolios at the starting value.
        points.push(YearPoint {
            year: 0,
            percent_fee_portfolio: pv,
            flat_fee_portfolio: pv,
            savings: 0.0,
        });

        let mut percent_fee_portfolio = pv;
        let mut flat_fee_portfolio = pv;
        for year in 1..=inputs.years {
            match inputs.mode {
                Mode::Accumulation => {
                    percent_fee_portfolio *= 1.0 + growth - fee;
                    flat_fee_portfolio = flat_fee_portfolio * (1.0 + growth) - FLAT_ANNUAL_FEE;
                }
                Mode::Decumulation => {
                    percent_fee_portfolio = (percent_fee_portfolio * (1.0 + growth - fee) - spend)
                        .round()
                        .max(0.0);
                    flat_fee_portfolio =
                        (flat_fee_portfolio * (1.0 + growth) - FLAT_ANNUAL_FEE - spend)
                            .round()
                            .max(0.0);
                }
            }

            points.push(YearPoint {
                year,
                percent_fee_portfolio,
                flat_fee_portfolio,
                // Negative when the flat fee is the worse deal.
                savings: flat_fee_portfolio - percent_fee_portfolio,
            });
        }
    }

    let annual_fee_dollars = pv * fee;
    let first_year_savings = annual_fee_dollars - FLAT_ANNUAL_FEE;
    let total_savings = points.last().map_or(0.0, |p| p.savings);
    let spending_power_years = if spend > 0.0 {
        total_savings / spend
    } else {
        0.0
    };

    ProjectionResult {
        points,
        annual_fee_dollars,
        first_year_savings,
        total_savings,
        spending_power_years,
    }
}

/// Splits one year of gross growth into the advisory fee and retained profit.
pub fn growth_breakdown(inputs: &Inputs) -> GrowthBreakdown {
    let annual_return = inputs.portfolio_value * inputs.growth_rate;
    let lost_to_fees = inputs.portfolio_value * inputs.annual_fee_rate;
    GrowthBreakdown {
        annual_return,
        lost_to_fees,
        net_profit: annual_return - lost_to_fees,
    }
}

/// Closed-form future values for the calculation-details card.
///
/// Percent fee: `pv * (1 + g - f)^n`. Flat fee: `pv * (1 + g)^n` minus the
/// future value of the fee payments, `1200 * ((1 + g)^n - 1) / g`. The
/// annuity factor degenerates to `n` when growth is zero, so no division by
/// the growth rate happens on that path.
pub fn future_value_detail(inputs: &Inputs) -> FutureValueDetail {
    let pv = inputs.portfolio_value;
    let growth = inputs.growth_rate;
    let n = inputs.years as i32;

    let growth_factor = (1.0 + growth).powi(n);
    let annuity_factor = if growth == 0.0 {
        f64::from(n)
    } else {
        (growth_factor - 1.0) / growth
    };

    let percent_fee_fv = pv * (1.0 + growth - inputs.annual_fee_rate).powi(n);
    let flat_fee_fv = pv * growth_factor - FLAT_ANNUAL_FEE * annuity_factor;

    FutureValueDetail {
        percent_fee_fv,
        flat_fee_fv,
        total_savings: flat_fee_fv - percent_fee_fv,
    }
}
