use foundation::time::Time;

/// Frame metadata handed to scheduled work.
///
/// Frames are either produced at a fixed timestep (`Frame::new`) or stamped
/// with the host clock (`Frame::at`, used by the browser front end).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn at(index: u64, time: Time, previous: Time) -> Self {
        Self {
            index,
            dt_s: (time.0 - previous.0).max(0.0),
            time,
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn stamped_frame_never_goes_backwards() {
        let f = Frame::at(3, Time(1.0), Time(1.5));
        assert_eq!(f.dt_s, 0.0);
        let g = Frame::at(4, Time(2.0), Time(1.5));
        assert_eq!(g.dt_s, 0.5);
    }
}
