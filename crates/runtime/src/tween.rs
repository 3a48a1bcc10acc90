use foundation::time::{Time, TimeSpan};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
    SinInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                let u = t * 2.0;
                if u <= 1.0 {
                    u * u * u / 2.0
                } else {
                    let v = u - 2.0;
                    (v * v * v + 2.0) / 2.0
                }
            }
            Easing::SinInOut => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
        }
    }
}

/// A timed, eased progression from 0 to 1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween {
    pub span: TimeSpan,
    pub easing: Easing,
}

impl Tween {
    pub fn new(start: Time, duration_ms: f64, easing: Easing) -> Self {
        Self {
            span: TimeSpan::starting_at(start, duration_ms),
            easing,
        }
    }

    pub fn progress(&self, now: Time) -> f64 {
        self.easing.apply(self.span.progress(now))
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.span.progress(now) >= 1.0
    }

    /// Linear interpolation between `from` and `to` at `now`.
    pub fn lerp(&self, from: f64, to: f64, now: Time) -> f64 {
        if self.is_finished(now) {
            return to;
        }
        from + (to - from) * self.progress(now)
    }
}
