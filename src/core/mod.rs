mod engine;
mod scale;
mod types;

pub use engine::{FLAT_ANNUAL_FEE, future_value_detail, growth_breakdown, project};
pub use scale::{DEFAULT_AXIS_MAX, TARGET_TICK_INTERVALS, compute_axis_range, nice_ticks};
pub use types::{
    AxisRange, FutureValueDetail, GrowthBreakdown, Inputs, Mode, ProjectionResult, YearPoint,
};
