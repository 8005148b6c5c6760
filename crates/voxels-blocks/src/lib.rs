//! Block catalog: the fixed set of block kinds on the wire and their properties.
#![forbid(unsafe_code)]

/// Raw block identifier as it appears in chunk payloads.
pub type BlockId = u8;

/// The empty cell.
pub const AIR: BlockId = 0;

/// Named block kinds, in wire-protocol order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Block {
    Air = 0,
    Grass,
    Dirt,
    Stone,
    OakLog,
    OakLeaves,
    Glass,
    Water,
    Sand,
    Snow,
    OakPlanks,
    StoneBricks,
    Netherrack,
    GoldBlock,
    PackedIce,
    Lava,
    Barrel,
    Bookshelf,
}

impl Block {
    pub const COUNT: usize = 18;

    #[inline]
    pub const fn id(self) -> BlockId {
        self as BlockId
    }

    pub const fn from_id(id: BlockId) -> Option<Block> {
        match id {
            0 => Some(Block::Air),
            1 => Some(Block::Grass),
            2 => Some(Block::Dirt),
            3 => Some(Block::Stone),
            4 => Some(Block::OakLog),
            5 => Some(Block::OakLeaves),
            6 => Some(Block::Glass),
            7 => Some(Block::Water),
            8 => Some(Block::Sand),
            9 => Some(Block::Snow),
            10 => Some(Block::OakPlanks),
            11 => Some(Block::StoneBricks),
            12 => Some(Block::Netherrack),
            13 => Some(Block::GoldBlock),
            14 => Some(Block::PackedIce),
            15 => Some(Block::Lava),
            16 => Some(Block::Barrel),
            17 => Some(Block::Bookshelf),
            _ => None,
        }
    }
}

/// Physical properties of a block kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlockProperties {
    pub solid: bool,
    pub transparent: bool,
}

const SOLID_OPAQUE: BlockProperties = BlockProperties {
    solid: true,
    transparent: false,
};

const PROPERTIES: [BlockProperties; Block::COUNT] = {
    let solid_clear = BlockProperties {
        solid: true,
        transparent: true,
    };
    let mut table = [SOLID_OPAQUE; Block::COUNT];
    table[Block::Air as usize] = BlockProperties {
        solid: false,
        transparent: true,
    };
    table[Block::OakLeaves as usize] = solid_clear;
    table[Block::Glass as usize] = solid_clear;
    table[Block::Water as usize] = solid_clear;
    table[Block::Lava as usize] = solid_clear;
    table
};

/// Looks up the properties for an identifier. Unknown ids read as solid and opaque.
#[inline]
pub fn properties(id: BlockId) -> BlockProperties {
    match PROPERTIES.get(id as usize) {
        Some(p) => *p,
        None => SOLID_OPAQUE,
    }
}

#[inline]
pub fn is_solid(id: BlockId) -> bool {
    properties(id).solid
}

#[inline]
pub fn is_transparent(id: BlockId) -> bool {
    properties(id).transparent
}

/// Per-id RGBA used by the renderer in place of a texture atlas.
const COLORS: [[u8; 4]; Block::COUNT] = [
    [0, 0, 0, 0],         // Air
    [104, 160, 70, 255],  // Grass
    [121, 85, 58, 255],   // Dirt
    [127, 127, 127, 255], // Stone
    [102, 81, 50, 255],   // OakLog
    [60, 110, 42, 200],   // OakLeaves
    [200, 230, 240, 120], // Glass
    [52, 108, 202, 180],  // Water
    [219, 206, 160, 255], // Sand
    [240, 245, 250, 255], // Snow
    [162, 130, 78, 255],  // OakPlanks
    [112, 112, 112, 255], // StoneBricks
    [97, 38, 38, 255],    // Netherrack
    [247, 207, 60, 255],  // GoldBlock
    [140, 180, 220, 255], // PackedIce
    [226, 90, 20, 255],   // Lava
    [109, 80, 47, 255],   // Barrel
    [140, 105, 64, 255],  // Bookshelf
];

/// Debug color for an identifier; unknown ids render magenta.
#[inline]
pub fn debug_color(id: BlockId) -> [u8; 4] {
    match COLORS.get(id as usize) {
        Some(c) => *c,
        None => [255, 0, 255, 255],
    }
}
