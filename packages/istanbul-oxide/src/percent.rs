/// Percentage with istanbul's rounding: truncated (never rounded up) to two
/// decimals, so 99.999% is never reported as 100%.
pub fn percent(covered: u32, total: u32) -> f32 {
    if total > 0 {
        let tmp: f64 = ((1000 * 100 * covered as u64) / total as u64) as f64;
        (tmp / 10_f64).floor() as f32 / 100_f32
    } else {
        100.0
    }
}
