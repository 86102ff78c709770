//! Placement priority classes and the block classification table.
//!
//! The table encodes real placement semantics: a crop must land after its
//! soil, a door after both of its halves are resolvable. Membership is a
//! compatibility requirement, not a tuning knob.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::block::{registry, BlockType, Category};

/// Commit-ordered placement class of a staged write.
///
/// Declaration order is commit order. The `Clear*` classes hold only
/// synthetic undo writes generated when a later-class occupant must be
/// removed before an earlier-class block can take its cell; they are never
/// produced by classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPriority {
    ClearFinal,
    ClearLast,
    ClearLate,
    First,
    Late,
    Last,
    Final,
}

impl PlacementPriority {
    /// All classes, in commit order.
    pub const ALL: [PlacementPriority; 7] = [
        PlacementPriority::ClearFinal,
        PlacementPriority::ClearLast,
        PlacementPriority::ClearLate,
        PlacementPriority::First,
        PlacementPriority::Late,
        PlacementPriority::Last,
        PlacementPriority::Final,
    ];

    /// Number of classes.
    pub const COUNT: usize = Self::ALL.len();

    /// Placement class of a block type. Unclassified types are `First`.
    pub fn of(ty: BlockType) -> PlacementPriority {
        PRIORITY_TABLE
            .get(&ty)
            .copied()
            .unwrap_or(PlacementPriority::First)
    }

    /// The clearing class that undoes an occupant of this class, if one
    /// exists. `First`-class blocks need no undo stage.
    pub fn clearing(self) -> Option<PlacementPriority> {
        match self {
            PlacementPriority::Final => Some(PlacementPriority::ClearFinal),
            PlacementPriority::Last => Some(PlacementPriority::ClearLast),
            PlacementPriority::Late => Some(PlacementPriority::ClearLate),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

static PRIORITY_TABLE: LazyLock<HashMap<BlockType, PlacementPriority>> =
    LazyLock::new(build_table);

fn build_table() -> HashMap<BlockType, PlacementPriority> {
    let mut table = HashMap::new();
    let reg = registry();

    let put = |table: &mut HashMap<BlockType, PlacementPriority>,
               name: &str,
               priority: PlacementPriority| {
        let ty = BlockType::by_name(name).expect("classified block type is registered");
        table.insert(ty, priority);
    };

    // Late: liquids and loose granular material
    for name in ["water", "lava", "sand", "gravel"] {
        put(&mut table, name, PlacementPriority::Late);
    }

    // Last: free-standing and attachment-sensitive blocks
    for category in [
        Category::Saplings,
        Category::FlowerPots,
        Category::Buttons,
        Category::Anvils,
        Category::WoodenPressurePlates,
        Category::Carpets,
        Category::Rails,
        Category::Beds,
        Category::Trapdoors,
    ] {
        for ty in reg.in_category(category) {
            table.insert(ty, PlacementPriority::Last);
        }
    }
    for name in [
        "grass", "tall_grass", "fern", "large_fern", "dandelion",
        "oxeye_daisy", "azure_bluet", "rose_bush", "brown_mushroom",
        "red_mushroom", "torch", "wall_torch", "fire", "redstone_wire",
        "wheat", "carrots", "potatoes", "beetroots", "cocoa", "nether_wart",
        "ladder", "lever", "redstone_torch", "redstone_wall_torch", "snow",
        "nether_portal", "end_portal", "repeater", "comparator", "vine",
        "lily_pad", "piston", "sticky_piston", "tripwire", "tripwire_hook",
        "stone_pressure_plate", "heavy_weighted_pressure_plate",
        "light_weighted_pressure_plate", "daylight_detector",
    ] {
        put(&mut table, name, PlacementPriority::Last);
    }

    // Final: fully dependency-chained blocks
    for category in [Category::Doors, Category::Banners, Category::Signs] {
        for ty in reg.in_category(category) {
            table.insert(ty, PlacementPriority::Final);
        }
    }
    for name in ["cactus", "sugar_cane", "cake", "piston_head", "moving_piston"] {
        put(&mut table, name, PlacementPriority::Final);
    }

    table
}
