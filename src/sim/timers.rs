//! Run-scoped deferred tasks
//!
//! Effects that fire some time after the tick that caused them (the slow
//! pickup's speed restoration) are queued here instead of on a host timer.
//! Each task remembers the run that scheduled it so a reset or a new run can
//! drop it before it touches fresh state.

use serde::{Deserialize, Serialize};

/// Something to apply to the game state once a task comes due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeferredEffect {
    /// Divide the listed obstacles' velocities by `factor` (undoing a slow)
    RestoreObstacleSpeed { obstacle_ids: Vec<u32>, factor: f32 },
}

/// A queued effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: u32,
    /// Run that scheduled the task
    pub run_id: u32,
    /// Scheduler clock time at which the task fires
    pub due_ms: f64,
    pub effect: DeferredEffect,
}

/// Deferred task queue with its own millisecond clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now_ms: f64,
    next_id: u32,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Queue `effect` to fire `delay_ms` from now; returns the task id
    pub fn schedule(&mut self, run_id: u32, delay_ms: f32, effect: DeferredEffect) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.tasks.push(ScheduledTask {
            id,
            run_id,
            due_ms: self.now_ms + delay_ms.max(0.0) as f64,
            effect,
        });
        id
    }

    /// Cancel every task scheduled by `run_id`; returns how many were dropped
    pub fn cancel_run(&mut self, run_id: u32) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.run_id != run_id);
        before - self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Advance the clock and remove the tasks that came due, oldest first
    pub fn advance(&mut self, dt_ms: f32) -> Vec<ScheduledTask> {
        self.now_ms += dt_ms.max(0.0) as f64;
        let now = self.now_ms;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due_ms <= now);
        self.tasks = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore(ids: &[u32]) -> DeferredEffect {
        DeferredEffect::RestoreObstacleSpeed {
            obstacle_ids: ids.to_vec(),
            factor: 0.5,
        }
    }

    #[test]
    fn test_task_fires_when_due() {
        let mut sched = Scheduler::new();
        sched.schedule(1, 4000.0, restore(&[3]));

        assert!(sched.advance(3999.0).is_empty());
        assert_eq!(sched.pending(), 1);

        let due = sched.advance(1.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].run_id, 1);
        assert_eq!(due[0].effect, restore(&[3]));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_due_tasks_in_order() {
        let mut sched = Scheduler::new();
        let late = sched.schedule(1, 300.0, restore(&[1]));
        let early = sched.schedule(1, 100.0, restore(&[2]));

        let due = sched.advance(500.0);
        let ids: Vec<u32> = due.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[test]
    fn test_cancel_run_only_drops_that_run() {
        let mut sched = Scheduler::new();
        sched.schedule(1, 100.0, restore(&[1]));
        sched.schedule(1, 200.0, restore(&[2]));
        sched.schedule(2, 100.0, restore(&[3]));

        assert_eq!(sched.cancel_run(1), 2);
        assert_eq!(sched.pending(), 1);

        let due = sched.advance(1000.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].run_id, 2);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut sched = Scheduler::new();
        sched.advance(50.0);
        sched.advance(-500.0);
        assert_eq!(sched.now_ms(), 50.0);
    }
}
