//! Multi-stage write reordering.
//!
//! The engine sits between a bulk editor and the sink. Every incoming
//! write is classified by placement priority and buffered instead of
//! applied; a commit pass flushes the buffers class by class, so blocks
//! that must exist before their neighbors (soil before crops, both door
//! halves before the door) reach the sink in a valid order.

use glam::IVec3;

use crate::block::BlockState;
use crate::core::Result;
use crate::sink::Sink;

use super::buffer::StageBuffer;
use super::commit::{CommitPlan, CommitStep};
use super::priority::PlacementPriority;
use super::resolver::{default_rules, AttachmentRule, FinalResolver};

/// Write-interception layer that re-orders bulk edits into placement
/// stages.
///
/// Single-threaded by design: one engine instance serves one logical edit
/// operation. Buffers drain completely on commit and the engine is ready
/// for the next operation without reconstruction.
pub struct StageReorder {
    stages: [StageBuffer; PlacementPriority::COUNT],
    rules: Vec<Box<dyn AttachmentRule>>,
    enabled: bool,
}

impl StageReorder {
    /// Create a new engine with re-ordering enabled.
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// Create a new engine.
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            stages: Default::default(),
            rules: default_rules(),
            enabled,
        }
    }

    /// Replace the attachment rules consulted by the terminal-stage
    /// resolver. The default rules cover door halves and rail support.
    pub fn with_rules(mut self, rules: Vec<Box<dyn AttachmentRule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Whether re-ordering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable re-ordering. Disabled, the engine passes writes
    /// straight through to the sink.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True when a commit pass would do any work.
    pub fn has_pending_work(&self) -> bool {
        self.enabled && self.stages.iter().any(|stage| !stage.is_empty())
    }

    /// Buffer contents for one class.
    pub fn staged(&self, priority: PlacementPriority) -> &StageBuffer {
        &self.stages[priority.index()]
    }

    fn stage(&mut self, priority: PlacementPriority) -> &mut StageBuffer {
        &mut self.stages[priority.index()]
    }

    /// Intercept a single-cell write.
    ///
    /// Reads the sink immediately (staged writes are invisible to reads),
    /// queues a clearing write when a later-class occupant must be undone
    /// first, stages the new state, and reports whether the cell's
    /// effective state will change. The sink itself is not mutated here.
    pub fn set_block<S: Sink>(
        &mut self,
        sink: &mut S,
        pos: IVec3,
        state: BlockState,
    ) -> Result<bool> {
        if !self.enabled {
            return sink.write(pos, state);
        }

        let existing = sink.read(pos)?;
        let priority = PlacementPriority::of(state.block_type());
        let existing_priority = PlacementPriority::of(existing.block_type());

        if let Some(clearing) = existing_priority.clearing() {
            // The occupant belongs to a later stage and would outlive an
            // earlier-class write; queue an undo so it cannot linger.
            let replacement = if state.is_air() {
                state.clone()
            } else {
                BlockState::air()
            };
            self.stage(clearing).put(pos, replacement);

            if state.is_air() {
                // The clearing write alone suffices.
                return Ok(!existing.fuzzy_eq(&state));
            }
        }

        let changed = !existing.fuzzy_eq(&state);
        self.stage(priority).put(pos, state);
        Ok(changed)
    }

    /// Build the commit plan for the current buffers.
    ///
    /// Returns `None` when re-ordering is disabled: writes already went
    /// straight to the sink, so no commit phase is contributed.
    pub fn prepare_commit(&mut self) -> Option<CommitPlan> {
        if !self.enabled {
            return None;
        }
        Some(CommitPlan::new())
    }

    /// Execute one commit step against the sink.
    pub fn run_step<S: Sink>(&mut self, step: CommitStep, sink: &mut S) -> Result<()> {
        match step {
            CommitStep::Flush(priority) => self.flush(priority, sink),
            CommitStep::ResolveFinal => self.resolve_final(sink),
        }
    }

    /// Prepare and run a full commit cycle, for callers without a
    /// cooperative step pipeline.
    pub fn commit<S: Sink>(&mut self, sink: &mut S) -> Result<()> {
        if let Some(mut plan) = self.prepare_commit() {
            while let Some(step) = plan.next_step() {
                self.run_step(step, sink)?;
            }
        }
        Ok(())
    }

    fn flush<S: Sink>(&mut self, priority: PlacementPriority, sink: &mut S) -> Result<()> {
        let buffer = &self.stages[priority.index()];
        if buffer.is_empty() {
            return Ok(());
        }
        log::debug!("flushing {} staged writes ({:?})", buffer.len(), priority);

        // The buffer is cleared only after every record lands; a sink
        // failure leaves the class staged for re-invocation. Records
        // already applied are simply rewritten then.
        for write in buffer.iter() {
            sink.write(write.pos, write.state.clone())?;
        }
        self.stage(priority).clear();
        Ok(())
    }

    fn resolve_final<S: Sink>(&mut self, sink: &mut S) -> Result<()> {
        let buffer = &self.stages[PlacementPriority::Final.index()];
        let mut resolver = FinalResolver::new(buffer.iter().cloned(), &self.rules);
        resolver.resolve(sink)?;

        // Terminal step: the cycle is complete, reset every buffer.
        for stage in &mut self.stages {
            stage.clear();
        }
        Ok(())
    }
}

impl Default for StageReorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::core::Error;
    use crate::sink::MemorySink;

    fn state(name: &str) -> BlockState {
        BlockState::new(BlockType::by_name(name).unwrap())
    }

    /// Sink wrapper counting writes.
    struct CountingSink {
        inner: MemorySink,
        writes: usize,
    }

    impl CountingSink {
        fn new() -> Self {
            Self {
                inner: MemorySink::new(),
                writes: 0,
            }
        }
    }

    impl Sink for CountingSink {
        fn read(&self, pos: IVec3) -> Result<BlockState> {
            self.inner.read(pos)
        }

        fn write(&mut self, pos: IVec3, state: BlockState) -> Result<bool> {
            self.writes += 1;
            self.inner.write(pos, state)
        }
    }

    /// Sink whose writes fail at one position; reads always succeed.
    struct FaultySink {
        inner: MemorySink,
        fail_at: IVec3,
    }

    impl Sink for FaultySink {
        fn read(&self, pos: IVec3) -> Result<BlockState> {
            self.inner.read(pos)
        }

        fn write(&mut self, pos: IVec3, state: BlockState) -> Result<bool> {
            if pos == self.fail_at {
                return Err(Error::Sink(format!("write rejected at {pos}")));
            }
            self.inner.write(pos, state)
        }
    }

    #[test]
    fn test_disabled_passthrough() {
        let mut sink = MemorySink::new();
        let mut reorder = StageReorder::with_enabled(false);
        let pos = IVec3::new(1, 2, 3);

        assert!(reorder.set_block(&mut sink, pos, state("stone")).unwrap());
        assert_eq!(sink.read(pos).unwrap(), state("stone"));
        assert!(!reorder.has_pending_work());
        assert!(reorder.prepare_commit().is_none());
    }

    #[test]
    fn test_writes_stage_without_touching_sink() {
        let mut sink = MemorySink::new();
        let mut reorder = StageReorder::new();
        let pos = IVec3::ZERO;

        assert!(reorder.set_block(&mut sink, pos, state("stone")).unwrap());
        assert!(sink.read(pos).unwrap().is_air());
        assert_eq!(reorder.staged(PlacementPriority::First).len(), 1);
        assert!(reorder.has_pending_work());
    }

    #[test]
    fn test_changed_flag_uses_fuzzy_equality() {
        let mut sink = MemorySink::new();
        sink.write(IVec3::ZERO, state("stone")).unwrap();

        let mut reorder = StageReorder::new();
        let changed = reorder
            .set_block(&mut sink, IVec3::ZERO, state("stone"))
            .unwrap();
        assert!(!changed);
        // The write is still staged; unchanged is not skipped.
        assert_eq!(reorder.staged(PlacementPriority::First).len(), 1);
    }

    #[test]
    fn test_classes_flush_in_commit_order() {
        let mut sink = MemorySink::new();
        let mut reorder = StageReorder::new();
        let pos = IVec3::new(0, 0, 0);

        // Stage a Late write, then a First write, at the same cell. The
        // Late class flushes after First and must win.
        reorder.set_block(&mut sink, pos, state("water")).unwrap();
        reorder.set_block(&mut sink, pos, state("stone")).unwrap();
        reorder.commit(&mut sink).unwrap();

        assert_eq!(sink.read(pos).unwrap(), state("water"));
        assert!(!reorder.has_pending_work());
    }

    #[test]
    fn test_clearing_write_for_late_occupant() {
        let mut sink = MemorySink::new();
        let mut reorder = StageReorder::new();
        let pos = IVec3::ZERO;

        // Cycle 1: water lands on the sink.
        reorder.set_block(&mut sink, pos, state("water")).unwrap();
        reorder.commit(&mut sink).unwrap();
        assert_eq!(sink.read(pos).unwrap(), state("water"));

        // Cycle 2: stone over water queues a ClearLate undo first.
        let changed = reorder.set_block(&mut sink, pos, state("stone")).unwrap();
        assert!(changed);
        assert_eq!(
            reorder.staged(PlacementPriority::ClearLate).get(pos),
            Some(&BlockState::air())
        );
        assert_eq!(
            reorder.staged(PlacementPriority::First).get(pos),
            Some(&state("stone"))
        );

        reorder.commit(&mut sink).unwrap();
        assert_eq!(sink.read(pos).unwrap(), state("stone"));
    }

    #[test]
    fn test_air_over_attachable_clears_without_placement() {
        let mut sink = MemorySink::new();
        let pos = IVec3::new(3, 4, 5);
        sink.write(pos, state("torch")).unwrap();

        let mut reorder = StageReorder::new();
        let changed = reorder
            .set_block(&mut sink, pos, BlockState::air())
            .unwrap();
        assert!(changed);

        // The clearing record carries the air state itself; nothing else
        // is staged.
        assert_eq!(
            reorder.staged(PlacementPriority::ClearLast).get(pos),
            Some(&BlockState::air())
        );
        assert!(reorder.staged(PlacementPriority::First).is_empty());

        reorder.commit(&mut sink).unwrap();
        assert!(sink.read(pos).unwrap().is_air());
    }

    #[test]
    fn test_single_undo_per_position_per_cycle() {
        let mut sink = MemorySink::new();
        let pos = IVec3::ZERO;
        sink.write(pos, state("torch")).unwrap();

        let mut reorder = StageReorder::new();
        reorder.set_block(&mut sink, pos, state("stone")).unwrap();
        reorder.set_block(&mut sink, pos, state("dirt")).unwrap();

        assert_eq!(reorder.staged(PlacementPriority::ClearLast).len(), 1);
        assert_eq!(reorder.staged(PlacementPriority::First).len(), 1);

        reorder.commit(&mut sink).unwrap();
        assert_eq!(sink.read(pos).unwrap(), state("dirt"));
    }

    #[test]
    fn test_clearing_final_occupant() {
        let mut sink = MemorySink::new();
        let pos = IVec3::new(7, 0, 7);
        let door = state("oak_door").with_prop("half", "lower");
        sink.write(pos, door).unwrap();

        let mut reorder = StageReorder::new();
        reorder.set_block(&mut sink, pos, state("stone")).unwrap();
        assert_eq!(
            reorder.staged(PlacementPriority::ClearFinal).get(pos),
            Some(&BlockState::air())
        );

        reorder.commit(&mut sink).unwrap();
        assert_eq!(sink.read(pos).unwrap(), state("stone"));
    }

    #[test]
    fn test_empty_commit_writes_nothing() {
        let mut sink = CountingSink::new();
        let mut reorder = StageReorder::new();

        assert!(!reorder.has_pending_work());
        reorder.commit(&mut sink).unwrap();
        assert_eq!(sink.writes, 0);
    }

    #[test]
    fn test_stepwise_pipeline_commit() {
        let mut sink = MemorySink::new();
        let mut reorder = StageReorder::new();
        let pos = IVec3::new(1, 0, 0);

        reorder.set_block(&mut sink, pos, state("stone")).unwrap();

        let mut plan = reorder.prepare_commit().unwrap();
        assert_eq!(plan.remaining(), PlacementPriority::COUNT);

        while let Some(step) = plan.next_step() {
            reorder.run_step(step, &mut sink).unwrap();
        }

        assert_eq!(sink.read(pos).unwrap(), state("stone"));
        assert!(!reorder.has_pending_work());
    }

    #[test]
    fn test_read_failure_propagates_from_set_block() {
        let mut sink = MemorySink::bounded(IVec3::ZERO, IVec3::new(7, 7, 7));
        let mut reorder = StageReorder::new();

        let result = reorder.set_block(&mut sink, IVec3::new(8, 0, 0), state("stone"));
        assert!(matches!(result, Err(Error::OutOfBounds(_))));
        assert!(!reorder.has_pending_work());
    }

    #[test]
    fn test_flush_failure_leaves_class_staged() {
        let good = IVec3::new(0, 0, 0);
        let bad = IVec3::new(1, 0, 0);
        let mut sink = FaultySink {
            inner: MemorySink::new(),
            fail_at: bad,
        };

        let mut reorder = StageReorder::new();
        reorder.set_block(&mut sink, good, state("stone")).unwrap();
        reorder.set_block(&mut sink, bad, state("stone")).unwrap();

        assert!(reorder.commit(&mut sink).is_err());
        // The failing class stays buffered for re-invocation.
        assert_eq!(reorder.staged(PlacementPriority::First).len(), 2);
        assert!(reorder.has_pending_work());
    }

    #[test]
    fn test_buffers_reusable_across_cycles() {
        let mut sink = MemorySink::new();
        let mut reorder = StageReorder::new();

        for cycle in 0..3 {
            let pos = IVec3::new(cycle, 0, 0);
            reorder.set_block(&mut sink, pos, state("stone")).unwrap();
            reorder.commit(&mut sink).unwrap();
            assert_eq!(sink.read(pos).unwrap(), state("stone"));
            assert!(!reorder.has_pending_work());
        }
    }
}
