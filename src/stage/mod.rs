//! Staged block-commit engine
//!
//! Writes are intercepted, classified by placement priority, and buffered
//! per class; a commit pass flushes the classes to the sink in a fixed
//! order, with the terminal class routed through a dependency resolver
//! that applies supporting cells first.

pub mod priority;
pub mod buffer;
pub mod commit;
pub mod reorder;
pub mod resolver;

pub use priority::PlacementPriority;
pub use buffer::{PendingWrite, StageBuffer};
pub use commit::{CommitPlan, CommitStep};
pub use reorder::StageReorder;
pub use resolver::{default_rules, AttachmentRule, DoorHalfRule, FinalResolver, RailSupportRule};
