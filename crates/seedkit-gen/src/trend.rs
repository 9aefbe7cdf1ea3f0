//! Trend shaping in basis points (10_000 = 1.0x of the base volume).

use seedkit_core::scenario::Trend;

pub const UNIT_BP: u64 = 10_000;

const GROWTH_STEP_BP: u64 = 400;
const DECLINE_STEP_BP: u64 = 300;
const DECLINE_FLOOR_BP: u64 = 2_000;

// Mon..Sun relative to the window start; weekend dip.
const WEEKLY_BP: [u64; 7] = [10_000, 10_400, 10_800, 10_600, 9_800, 8_200, 8_000];

/// Multiplier for `day` (1-based). Depends on nothing but its arguments.
///
/// - STABLE: flat.
/// - GROWTH: +4% of base per day, strictly increasing.
/// - DECLINE: -3% of base per day, floored at 20%.
/// - SEASONAL: repeating 7-day cycle.
pub fn trend_factor_bp(trend: Trend, day: u32) -> u64 {
    let offset = u64::from(day.saturating_sub(1));
    match trend {
        Trend::Stable => UNIT_BP,
        Trend::Growth => UNIT_BP + GROWTH_STEP_BP * offset,
        Trend::Decline => UNIT_BP
            .saturating_sub(DECLINE_STEP_BP.saturating_mul(offset))
            .max(DECLINE_FLOOR_BP),
        Trend::Seasonal => WEEKLY_BP[(offset % 7) as usize],
    }
}
