use crate::TriangleIndices;

/// Identifies a vertex instance: a position paired with a normal.
///
/// Corners sharing a [`BaseIndex`] contribute to the same basis, unless their
/// texture mapping has opposite handedness.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub(crate) struct BaseIndex {
    pub(crate) position: u32,
    pub(crate) normal: u32,
}

impl BaseIndex {
    pub(crate) const fn new(position: u32, normal: u32) -> Self {
        Self { position, normal }
    }

    /// Returns the [`BaseIndex`] of each corner of a triangle.
    pub(crate) fn corners(indices: &TriangleIndices) -> [Self; 3] {
        [0, 1, 2].map(|i| Self::new(indices.position[i], indices.normal[i]))
    }

    /// Returns `true` if two corners of a triangle collapse onto the same
    /// vertex instance.
    pub(crate) fn any_shared(corners: &[Self; 3]) -> bool {
        let iter = corners.iter().cycle();
        iter.clone().zip(iter.skip(1)).take(3).any(|(a, b)| a == b)
    }
}
