//! Commit protocol - the ordered steps a pipeline executes per cycle.

use std::collections::VecDeque;

use super::priority::PlacementPriority;

/// One unit of commit work.
///
/// Steps are synchronous and non-preemptible once started. A pipeline that
/// cancels between steps leaves earlier classes flushed and later classes
/// still buffered; partial cycles are not rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitStep {
    /// Write one class buffer to the sink in insertion order, then clear it.
    Flush(PlacementPriority),
    /// Resolve and apply the terminal class, then clear all buffers.
    ResolveFinal,
}

/// Ordered sequence of commit steps for one commit cycle.
#[derive(Debug)]
pub struct CommitPlan {
    steps: VecDeque<CommitStep>,
}

impl CommitPlan {
    pub(crate) fn new() -> Self {
        let mut steps: VecDeque<CommitStep> = PlacementPriority::ALL
            .iter()
            .filter(|&&priority| priority != PlacementPriority::Final)
            .map(|&priority| CommitStep::Flush(priority))
            .collect();
        steps.push_back(CommitStep::ResolveFinal);
        Self { steps }
    }

    /// Next step to execute, or `None` when the cycle is complete.
    pub fn next_step(&mut self) -> Option<CommitStep> {
        self.steps.pop_front()
    }

    /// Steps not yet handed out.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}
