use super::domain::Candidate;

const GAP_WEIGHT: f64 = 0.45;
const SIGNAL_WEIGHT: f64 = 0.35;
const SIZE_WEIGHT: f64 = 0.20;
const GAP_SPAN: f64 = 3.0;
const FIELD_SPAN: f64 = 8.0;

pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Blend score gap, base signals and field size into a value in `[0, 1]`.
///
/// A schema with fewer than two runners has nothing to compare the base
/// against and yields zero.
pub fn estimate_confidence(schema: &[Candidate], signals_defined: u8) -> f64 {
    let [base, second, ..] = schema else {
        return 0.0;
    };

    let score_gap = f64::from(base.structural_score) - f64::from(second.structural_score);
    let gap = clamp01(score_gap / GAP_SPAN);
    let sig = if signals_defined == 0 {
        0.0
    } else {
        f64::from(base.signal_count()) / f64::from(signals_defined)
    };
    let size = clamp01(1.0 - (schema.len() as f64 - 2.0) / FIELD_SPAN);

    let blended =
        GAP_WEIGHT * gap + SIGNAL_WEIGHT * sig + SIZE_WEIGHT * size + base.driver_impact();
    clamp01(blended)
}
