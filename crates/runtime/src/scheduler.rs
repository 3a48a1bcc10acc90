use foundation::time::Time;

use crate::frame::Frame;
use crate::job::{RepeatingTask, TaskControl, TaskId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub ran_tasks: usize,
    pub stopped_tasks: usize,
}

#[derive(Debug)]
struct Scheduled {
    id: TaskId,
    next_due: Time,
    task: RepeatingTask,
}

/// Owns every repeating task of a page and runs the ones that are due.
///
/// Ordering contract: due tasks run by `(next_due, id)`, so two tasks due at
/// the same instant run in registration order.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&mut self, task: RepeatingTask, now: Time) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let next_due = Time(now.0 + task.initial_delay_s);
        self.tasks.push(Scheduled { id, next_due, task });
        id
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_running(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|s| s.id == id)
    }

    /// Stops a single task. Returns `true` if it was still running.
    pub fn stop(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|s| s.id != id);
        before != self.tasks.len()
    }

    /// Stops every task; called when the page goes away.
    pub fn teardown(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    pub fn tick(&mut self, frame: Frame) -> TickSummary {
        let now = frame.time;
        let mut due: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, s)| s.next_due.0 <= now.0)
            .map(|(idx, _)| idx)
            .collect();
        due.sort_by(|&a, &b| {
            let (sa, sb) = (&self.tasks[a], &self.tasks[b]);
            sa.next_due
                .0
                .total_cmp(&sb.next_due.0)
                .then_with(|| sa.id.cmp(&sb.id))
        });

        let mut summary = TickSummary::default();
        let mut finished: Vec<TaskId> = Vec::new();
        for idx in due {
            let scheduled = &mut self.tasks[idx];
            summary.ran_tasks += 1;
            match (scheduled.task.run)(frame) {
                TaskControl::Stop => finished.push(scheduled.id),
                TaskControl::Continue => {
                    let period = scheduled.task.period_s.max(0.0);
                    let mut next = scheduled.next_due.0 + period;
                    // A host that stalled for several periods resumes from now
                    // instead of replaying the missed runs.
                    if next <= now.0 {
                        next = now.0 + period;
                    }
                    scheduled.next_due = Time(next);
                }
            }
        }

        if !finished.is_empty() {
            self.tasks.retain(|s| !finished.contains(&s.id));
            summary.stopped_tasks = finished.len();
        }
        summary
    }
}
