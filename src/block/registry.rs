//! Block type registry - interned type identities, categories, materials.
//!
//! The registry is global, read-only data: built once on first use, shared
//! by reference, with no mutation path after initialization. Block types
//! are interned as small copyable handles so they can be used as map keys
//! throughout the commit engine.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Block category, used by placement classification and attachment rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Saplings,
    FlowerPots,
    Buttons,
    Anvils,
    WoodenPressurePlates,
    Carpets,
    Rails,
    Beds,
    Trapdoors,
    Doors,
    Banners,
    Signs,
}

/// Physical material flags consulted by the commit engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Material {
    /// Empty space; writing this removes whatever occupies the cell
    pub air: bool,
    /// Destroyed when the block it rests on is pushed or removed
    pub fragile_when_pushed: bool,
}

impl Material {
    /// Plain solid block
    pub const SOLID: Material = Material { air: false, fragile_when_pushed: false };
    /// Empty space
    pub const AIR: Material = Material { air: true, fragile_when_pushed: false };
    /// Attachment-sensitive block that breaks without support
    pub const FRAGILE: Material = Material { air: false, fragile_when_pushed: true };
}

/// Interned block type identity. Cheap copyable handle into the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockType(u16);

impl BlockType {
    /// The air sentinel; always the first registered type.
    pub const AIR: BlockType = BlockType(0);

    /// Look up a type by its canonical name.
    pub fn by_name(name: &str) -> Option<BlockType> {
        registry().lookup(name)
    }

    /// Canonical name of this type.
    pub fn name(self) -> &'static str {
        registry().name(self)
    }

    /// Material flags of this type.
    pub fn material(self) -> Material {
        registry().material(self)
    }

    /// Whether this type belongs to `category`.
    pub fn is(self, category: Category) -> bool {
        registry().is_in(self, category)
    }

    /// Whether this type is empty space.
    pub fn is_air(self) -> bool {
        self.material().air
    }
}

struct BlockTypeDef {
    name: String,
    material: Material,
    categories: Vec<Category>,
}

/// Immutable table of known block types.
pub struct BlockRegistry {
    defs: Vec<BlockTypeDef>,
    by_name: HashMap<String, BlockType>,
}

impl BlockRegistry {
    pub fn lookup(&self, name: &str) -> Option<BlockType> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, ty: BlockType) -> &str {
        &self.def(ty).name
    }

    pub fn material(&self, ty: BlockType) -> Material {
        self.def(ty).material
    }

    pub fn is_in(&self, ty: BlockType, category: Category) -> bool {
        self.def(ty).categories.contains(&category)
    }

    /// All types belonging to `category`, in registration order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = BlockType> + '_ {
        self.defs
            .iter()
            .enumerate()
            .filter(move |(_, def)| def.categories.contains(&category))
            .map(|(i, _)| BlockType(i as u16))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    fn def(&self, ty: BlockType) -> &BlockTypeDef {
        &self.defs[ty.0 as usize]
    }

    fn register(&mut self, name: &str, material: Material, categories: &[Category]) -> BlockType {
        let ty = BlockType(self.defs.len() as u16);
        self.defs.push(BlockTypeDef {
            name: name.to_string(),
            material,
            categories: categories.to_vec(),
        });
        self.by_name.insert(name.to_string(), ty);
        ty
    }

    /// Build the vanilla block set.
    fn vanilla() -> Self {
        let mut reg = BlockRegistry {
            defs: Vec::new(),
            by_name: HashMap::new(),
        };

        // Air first so BlockType::AIR is a stable handle.
        reg.register("air", Material::AIR, &[]);
        reg.register("cave_air", Material::AIR, &[]);

        // Plain solids
        for name in [
            "stone", "dirt", "grass_block", "cobblestone", "sandstone", "glass",
            "obsidian", "bedrock", "oak_planks", "iron_block", "gold_block",
            "farmland", "soul_sand",
        ] {
            reg.register(name, Material::SOLID, &[]);
        }

        // Liquids and loose granular material
        for name in ["water", "lava", "sand", "gravel"] {
            reg.register(name, Material::SOLID, &[]);
        }

        // Wood-species variants
        for wood in WOODS {
            reg.register(&format!("{wood}_sapling"), Material::FRAGILE, &[Category::Saplings]);
            reg.register(&format!("{wood}_button"), Material::FRAGILE, &[Category::Buttons]);
            reg.register(&format!("{wood}_pressure_plate"), Material::FRAGILE, &[Category::WoodenPressurePlates]);
            reg.register(&format!("{wood}_trapdoor"), Material::FRAGILE, &[Category::Trapdoors]);
            reg.register(&format!("{wood}_door"), Material::FRAGILE, &[Category::Doors]);
            reg.register(&format!("{wood}_sign"), Material::FRAGILE, &[Category::Signs]);
            reg.register(&format!("{wood}_wall_sign"), Material::FRAGILE, &[Category::Signs]);
        }
        reg.register("iron_door", Material::FRAGILE, &[Category::Doors]);
        reg.register("iron_trapdoor", Material::FRAGILE, &[Category::Trapdoors]);
        reg.register("stone_button", Material::FRAGILE, &[Category::Buttons]);

        // Color variants
        for color in COLORS {
            reg.register(&format!("{color}_bed"), Material::FRAGILE, &[Category::Beds]);
            reg.register(&format!("{color}_carpet"), Material::FRAGILE, &[Category::Carpets]);
            reg.register(&format!("{color}_banner"), Material::FRAGILE, &[Category::Banners]);
            reg.register(&format!("{color}_wall_banner"), Material::FRAGILE, &[Category::Banners]);
        }

        // Rails
        for name in ["rail", "powered_rail", "detector_rail", "activator_rail"] {
            reg.register(name, Material::FRAGILE, &[Category::Rails]);
        }

        // Anvils
        for name in ["anvil", "chipped_anvil", "damaged_anvil"] {
            reg.register(name, Material::SOLID, &[Category::Anvils]);
        }

        // Flower pots
        for name in ["flower_pot", "potted_dandelion", "potted_fern"] {
            reg.register(name, Material::FRAGILE, &[Category::FlowerPots]);
        }

        // Free-standing decorative and mechanical blocks
        for name in [
            "grass", "tall_grass", "fern", "large_fern", "dandelion",
            "oxeye_daisy", "azure_bluet", "rose_bush", "brown_mushroom",
            "red_mushroom", "torch", "wall_torch", "fire", "redstone_wire",
            "wheat", "carrots", "potatoes", "beetroots", "cocoa", "nether_wart",
            "ladder", "lever", "redstone_torch", "redstone_wall_torch", "snow",
            "nether_portal", "end_portal", "repeater", "comparator", "vine",
            "lily_pad", "tripwire", "tripwire_hook", "stone_pressure_plate",
            "heavy_weighted_pressure_plate", "light_weighted_pressure_plate",
        ] {
            reg.register(name, Material::FRAGILE, &[]);
        }
        reg.register("daylight_detector", Material::SOLID, &[]);
        reg.register("piston", Material::SOLID, &[]);
        reg.register("sticky_piston", Material::SOLID, &[]);

        // Fully dependency-chained blocks
        for name in ["cactus", "sugar_cane", "cake", "piston_head"] {
            reg.register(name, Material::FRAGILE, &[]);
        }
        reg.register("moving_piston", Material::SOLID, &[]);

        reg
    }
}

/// Wood species used for the per-species block variants.
const WOODS: &[&str] = &["oak", "spruce", "birch", "jungle", "acacia", "dark_oak"];

/// Dye colors used for the per-color block variants.
const COLORS: &[&str] = &[
    "white", "orange", "magenta", "light_blue", "yellow", "lime", "pink",
    "gray", "light_gray", "cyan", "purple", "blue", "green", "red", "black",
    "brown",
];

static REGISTRY: LazyLock<BlockRegistry> = LazyLock::new(BlockRegistry::vanilla);

/// Global immutable block registry.
pub fn registry() -> &'static BlockRegistry {
    &REGISTRY
}
