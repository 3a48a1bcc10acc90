use runtime::tween::Easing;

/// Seconds to fade the scroll hint down, and again to fade it back up.
pub const HALF_PERIOD_S: f64 = 1.0;
pub const MIN_OPACITY: f64 = 0.3;

/// Opacity of the scroll hint `t_s` seconds after the pulse started:
/// 1 → 0.3 → 1, sine-eased, repeating every two half periods.
pub fn pulse_opacity(t_s: f64) -> f64 {
    let cycle = 2.0 * HALF_PERIOD_S;
    let phase = t_s.max(0.0).rem_euclid(cycle);
    let (from, to, local) = if phase < HALF_PERIOD_S {
        (1.0, MIN_OPACITY, phase / HALF_PERIOD_S)
    } else {
        (MIN_OPACITY, 1.0, (phase - HALF_PERIOD_S) / HALF_PERIOD_S)
    };
    from + (to - from) * Easing::SinInOut.apply(local)
}
