use super::types::{AxisRange, Mode, YearPoint};

/// Fallback display range when there is nothing to plot.
pub const DEFAULT_AXIS_MAX: f64 = 100_000.0;

/// Aim for roughly this many tick intervals on the value axis.
pub const TARGET_TICK_INTERVALS: u32 = 6;

const HEADROOM: f64 = 1.05;

/// Derives the value-axis display range and tick positions for a series.
///
/// Accumulation anchors the floor just under the starting portfolio value
/// and leaves headroom above the flat-fee line, so the gap between the two
/// curves fills the chart. Decumulation hard-floors at zero because balances
/// cannot go negative in that view.
pub fn compute_axis_range(points: &[YearPoint], mode: Mode, portfolio_value: f64) -> AxisRange {
    let (min, max) = axis_domain(points, mode, portfolio_value);
    let ticks = nice_ticks(min, max, TARGET_TICK_INTERVALS);
    AxisRange { min, max, ticks }
}

fn axis_domain(points: &[YearPoint], mode: Mode, portfolio_value: f64) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, DEFAULT_AXIS_MAX);
    }

    match mode {
        Mode::Decumulation => {
            let max_balance = points
                .iter()
                .flat_map(|p| [p.percent_fee_portfolio, p.flat_fee_portfolio])
                .filter(|v| v.is_finite())
                .fold(f64::NEG_INFINITY, f64::max);
            if !max_balance.is_finite() {
                return (0.0, DEFAULT_AXIS_MAX);
            }
            (0.0, max_balance * HEADROOM)
        }
        Mode::Accumulation => {
            let final_flat_fee = points
                .last()
                .map(|p| p.flat_fee_portfolio)
                .filter(|v| v.is_finite());
            let Some(final_flat_fee) = final_flat_fee else {
                return (0.0, DEFAULT_AXIS_MAX);
            };
            (portfolio_value * 0.95, final_flat_fee * HEADROOM)
        }
    }
}

/// "Nice numbers" tick generation.
///
/// Snaps the raw interval `(max - min) / target_intervals` to 1, 2, 5 or 10
/// times its power of ten, then emits every multiple of that interval across
/// the range. The result reads as round labels (multiples of 50,000 rather
/// than 48,333) regardless of the input magnitude.
pub fn nice_ticks(min: f64, max: f64, target_intervals: u32) -> Vec<f64> {
    let range = max - min;
    if range <= 0.0 {
        return vec![min];
    }

    let raw_interval = range / f64::from(target_intervals.max(1));
    let magnitude = 10f64.powf(raw_interval.log10().floor());
    let normalized = raw_interval / magnitude;

    let snapped = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    let tick_interval = snapped * magnitude;

    let min_tick = (min / tick_interval).floor() * tick_interval;
    let max_tick = (max / tick_interval).ceil() * tick_interval;

    let mut ticks = Vec::new();
    let mut tick = min_tick;
    // interval/100 tolerance absorbs accumulated floating-point drift.
    while tick <= max_tick + tick_interval / 100.0 {
        if tick >= min * 0.99 && tick <= max * 1.01 {
            ticks.push(tick);
        }
        tick += tick_interval;
    }
    ticks
}
