use foundation::time::Time;
use runtime::Frame;

/// Page clock on the `performance.now()` timeline, in milliseconds.
///
/// `requestAnimationFrame` timestamps share this timeline, so frames and
/// input handlers can both stamp through it. The clock never runs
/// backwards.
#[derive(Debug, Clone, Copy)]
pub struct PageClock {
    frame_index: u64,
    last: Time,
}

impl PageClock {
    pub const fn new() -> Self {
        Self {
            frame_index: 0,
            last: Time::ZERO,
        }
    }

    pub fn now(&self) -> Time {
        self.last
    }

    /// Records a timestamp seen outside the frame loop, e.g. by an input
    /// handler. Stale or non-finite stamps leave the clock where it is.
    pub fn observe(&mut self, now_ms: f64) -> Time {
        let t = Time::from_millis(now_ms);
        if t.0.is_finite() && t > self.last {
            self.last = t;
        }
        self.last
    }

    /// Stamps the next animation frame.
    pub fn frame(&mut self, now_ms: f64) -> Frame {
        let previous = self.last;
        let time = self.observe(now_ms);
        let frame = Frame::at(self.frame_index, time, previous);
        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::PageClock;
    use controller::{MapConfig, MapController};
    use foundation::math::Vec2;
    use foundation::time::Time;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const SAMPLE: &str = include_str!("../assets/world_sample.geojson");
    const USA: usize = 1;
    const IRELAND: usize = 4;

    #[test]
    fn stale_and_bogus_stamps_do_not_rewind() {
        let mut clock = PageClock::new();
        assert_eq!(clock.observe(1500.0), Time(1.5));
        assert_eq!(clock.observe(900.0), Time(1.5));
        assert_eq!(clock.observe(f64::NAN), Time(1.5));
        assert_eq!(clock.observe(1600.0), Time(1.6));
    }

    #[test]
    fn frames_count_up_with_deltas() {
        let mut clock = PageClock::new();
        clock.observe(1000.0);
        let a = clock.frame(1016.0);
        let b = clock.frame(1032.0);
        assert_eq!((a.index, b.index), (0, 1));
        assert!((a.dt_s - 0.016).abs() < 1e-12);
        assert!((b.dt_s - 0.016).abs() < 1e-12);
        assert_eq!(b.time, clock.now());
    }

    #[test]
    fn handlers_and_frames_drive_animations_on_one_timeline() {
        let registry = Arc::new(registry::builtin::space_programs().unwrap());
        let mut map = MapController::new(registry, MapConfig::default());
        let mut clock = PageClock::new();

        // page load, then the fetch resolves a little later
        map.advance(clock.observe(1200.0));
        map.advance(clock.observe(1450.0));
        map.load_dataset(Ok(SAMPLE)).unwrap();

        map.advance(clock.observe(2000.0));
        map.pointer_enter(IRELAND, Vec2::new(10.0, 10.0));
        map.pointer_leave(IRELAND);
        map.click(USA);
        let target = map.target_view();
        assert!(target.k > 1.0);

        let mut t = 2000.0;
        for _ in 0..60 {
            t += 16.0;
            map.advance(clock.frame(t).time);
        }
        assert!(!map.is_animating());
        assert_eq!(map.view(), target);
        assert_eq!(map.panel().opacity(clock.now()), 1.0);
        assert_eq!(map.tooltip().opacity(clock.now()), 0.0);
        assert_eq!(map.shape(IRELAND).unwrap().outline_width(clock.now()), 0.5);
    }
}
