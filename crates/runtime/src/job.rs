use crate::frame::Frame;

/// Identifier handed out by the [`Scheduler`](crate::Scheduler).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// What a task body asks the scheduler to do after it ran.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TaskControl {
    Continue,
    Stop,
}

/// A unit of work that re-arms itself every `period_s` seconds until it is
/// stopped.
///
/// Replaces "restart the animation from its own completion callback" loops:
/// the loop lives in the scheduler, which can always stop it.
pub struct RepeatingTask {
    pub name: &'static str,
    pub period_s: f64,
    /// Delay before the first run (seconds after registration).
    pub initial_delay_s: f64,
    pub run: Box<dyn FnMut(Frame) -> TaskControl>,
}

impl RepeatingTask {
    pub fn new(
        name: &'static str,
        period_s: f64,
        run: impl FnMut(Frame) -> TaskControl + 'static,
    ) -> Self {
        Self {
            name,
            period_s,
            initial_delay_s: 0.0,
            run: Box::new(run),
        }
    }

    pub fn with_initial_delay(mut self, delay_s: f64) -> Self {
        self.initial_delay_s = delay_s.max(0.0);
        self
    }
}

impl std::fmt::Debug for RepeatingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepeatingTask")
            .field("name", &self.name)
            .field("period_s", &self.period_s)
            .field("initial_delay_s", &self.initial_delay_s)
            .finish_non_exhaustive()
    }
}
