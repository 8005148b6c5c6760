/// Face direction of a quad. The discriminant is the packed `orientation` field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

pub const ALL_FACES: [Face; 6] = [
    Face::PosX,
    Face::NegX,
    Face::PosY,
    Face::NegY,
    Face::PosZ,
    Face::NegZ,
];

impl Face {
    /// Returns the `[0..6)` orientation code of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an orientation code `[0..6)` back into a `Face` value.
    /// Falls back to `PosX` for out-of-range codes.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            0 => Face::PosX,
            1 => Face::NegX,
            2 => Face::PosY,
            3 => Face::NegY,
            4 => Face::PosZ,
            5 => Face::NegZ,
            _ => Face::PosX,
        }
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// True for the faces whose normal points along the positive axis.
    #[inline]
    pub fn positive(self) -> bool {
        matches!(self, Face::PosX | Face::PosY | Face::PosZ)
    }

    /// Maps a slab cell back to grid coordinates. `w` runs along the face
    /// normal's axis; `(u, v)` are the remaining axes: X→(y,z), Y→(x,z), Z→(x,y).
    #[inline]
    pub fn cell(self, w: usize, u: usize, v: usize) -> (i32, i32, i32) {
        match self {
            Face::PosX | Face::NegX => (w as i32, u as i32, v as i32),
            Face::PosY | Face::NegY => (u as i32, w as i32, v as i32),
            Face::PosZ | Face::NegZ => (u as i32, v as i32, w as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for (i, face) in ALL_FACES.into_iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(Face::from_index(i), face);
        }
        assert_eq!(Face::from_index(9), Face::PosX);
    }

    #[test]
    fn delta_points_along_the_normal_axis() {
        for face in ALL_FACES {
            let (dx, dy, dz) = face.delta();
            assert_eq!(dx.abs() + dy.abs() + dz.abs(), 1);
            let sign = dx + dy + dz;
            assert_eq!(sign > 0, face.positive());
        }
    }

    #[test]
    fn cell_places_w_on_the_normal_axis() {
        assert_eq!(Face::PosX.cell(7, 1, 2), (7, 1, 2));
        assert_eq!(Face::NegY.cell(7, 1, 2), (1, 7, 2));
        assert_eq!(Face::PosZ.cell(7, 1, 2), (1, 2, 7));
    }
}
