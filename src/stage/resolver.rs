//! Terminal-stage dependency resolution.
//!
//! The terminal class holds blocks whose placement depends on a specific
//! neighboring cell existing first. Rather than topologically sorting the
//! whole batch (most records have no dependencies at all), the resolver
//! walks each attachment chain backward from an arbitrary record,
//! front-loading the required supports so the chain applies support-first.
//! Mutual attachments are applied in the order accumulated when the cycle
//! is detected; at least one cell of a cycle is always a legitimate
//! placement, so best effort beats failing the batch.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::IVec3;

use crate::block::{BlockState, Category};
use crate::core::types::{DOWN, UP};
use crate::core::Result;
use crate::sink::Sink;

use super::buffer::PendingWrite;

/// Names the neighboring cell a block requires to be applied first.
pub trait AttachmentRule: Send + Sync {
    /// Position that must hold its target before `state` lands at `pos`,
    /// or `None` when the rule does not apply.
    fn required_support(&self, pos: IVec3, state: &BlockState) -> Option<IVec3>;
}

/// Lower halves of two-cell doors are attached to the floor and to their
/// upper half; the upper half must be applied first.
pub struct DoorHalfRule;

impl AttachmentRule for DoorHalfRule {
    fn required_support(&self, pos: IVec3, state: &BlockState) -> Option<IVec3> {
        if state.block_type().is(Category::Doors) && state.prop("half") == Some("lower") {
            Some(pos + UP)
        } else {
            None
        }
    }
}

/// Rails must rest on the cell below them.
pub struct RailSupportRule;

impl AttachmentRule for RailSupportRule {
    fn required_support(&self, pos: IVec3, state: &BlockState) -> Option<IVec3> {
        if state.block_type().is(Category::Rails) {
            Some(pos + DOWN)
        } else {
            None
        }
    }
}

/// The rule set matching vanilla placement behavior.
pub fn default_rules() -> Vec<Box<dyn AttachmentRule>> {
    vec![Box::new(DoorHalfRule), Box::new(RailSupportRule)]
}

/// One-shot committer for the terminal class. Built fresh per commit pass;
/// once resolved, the instance holds nothing.
pub struct FinalResolver<'a> {
    pending: HashSet<IVec3>,
    targets: HashMap<IVec3, BlockState>,
    rules: &'a [Box<dyn AttachmentRule>],
}

impl<'a> FinalResolver<'a> {
    pub fn new<I>(writes: I, rules: &'a [Box<dyn AttachmentRule>]) -> Self
    where
        I: IntoIterator<Item = PendingWrite>,
    {
        let mut pending = HashSet::new();
        let mut targets = HashMap::new();
        for write in writes {
            pending.insert(write.pos);
            targets.insert(write.pos, write.state);
        }
        Self {
            pending,
            targets,
            rules,
        }
    }

    /// Apply every record to the sink, support cells first.
    pub fn resolve<S: Sink>(&mut self, sink: &mut S) -> Result<()> {
        if !self.pending.is_empty() {
            log::debug!("resolving {} terminal-stage writes", self.pending.len());
        }

        while let Some(&start) = self.pending.iter().next() {
            let chain = self.walk_chain(start);
            for pos in chain {
                sink.write(pos, self.targets[&pos].clone())?;
                self.pending.remove(&pos);
            }
        }
        Ok(())
    }

    /// Walk attachment dependencies backward from `start`.
    ///
    /// Each required support is pushed to the front of the chain, so the
    /// returned order is support-first, dependent-last. Iterative on
    /// purpose: chain length is input-controlled.
    fn walk_chain(&self, start: IVec3) -> VecDeque<IVec3> {
        let mut chain = VecDeque::new();
        chain.push_front(start);
        let mut cur = start;

        loop {
            let state = &self.targets[&cur];

            let mut next = None;
            for rule in self.rules {
                if let Some(support) = rule.required_support(cur, state) {
                    if chain.contains(&support) {
                        // Mutual attachment; no order satisfies every cell,
                        // so place them in the order accumulated so far.
                        return chain;
                    }
                    if self.pending.contains(&support) {
                        next = Some(support);
                        break;
                    }
                }
            }

            if let Some(support) = next {
                chain.push_front(support);
            }

            if !state.block_type().material().fragile_when_pushed {
                // Not attached to anything; safe to place.
                break;
            }

            match next {
                Some(support) => cur = support,
                None => break,
            }
        }

        chain
    }
}
