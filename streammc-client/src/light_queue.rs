use std::collections::VecDeque;

use crate::config::LightQueueConfig;

/// FIFO of deferred light work, drained a bounded amount per tick.
#[derive(Debug)]
pub struct LightUpdateQueue<T> {
    config: LightQueueConfig,
    tasks: VecDeque<T>,
}

impl<T> LightUpdateQueue<T> {
    pub fn new(config: LightQueueConfig) -> Self {
        Self {
            config,
            tasks: VecDeque::new(),
        }
    }

    pub fn push(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// How many tasks the next tick will run.
    pub fn tick_budget(&self) -> usize {
        let pending = self.tasks.len();
        if pending >= self.config.backlog_threshold {
            return pending;
        }
        (pending / self.config.divisor.max(1))
            .max(self.config.min_batch)
            .min(pending)
    }

    /// Removes this tick's share of tasks, oldest first.
    pub fn drain_tick(&mut self) -> Vec<T> {
        let budget = self.tick_budget();
        self.tasks.drain(..budget).collect()
    }
}
