use core::marker::PhantomData;

use crate::{IndexedMeshError, Ops, TriangleIndices, TriangleInput};

/// A [`TriangleInput`] over caller-owned attribute streams.
///
/// Each stream has its own index buffer with one entry per triangle corner,
/// the layout used by most interchange formats (OBJ, FBX) where positions,
/// normals and texture coordinates are indexed independently.
/// Meshes with a single shared index buffer simply pass it three times.
///
/// The normal stream is indexed per corner, so [`TriangleInput::normal`]
/// returns the normal referenced by that corner.
pub struct IndexedMesh<
    'a,
    #[cfg(not(feature = "std"))] O: Ops,
    #[cfg(feature = "std")] O: Ops = crate::StdOps,
> {
    positions: &'a [[f32; 3]],
    normals: &'a [[f32; 3]],
    uvs: &'a [[f32; 2]],
    position_indices: &'a [u32],
    normal_indices: &'a [u32],
    uv_indices: &'a [u32],
    _ops: PhantomData<O>,
}

#[cfg(feature = "std")]
impl<'a> IndexedMesh<'a> {
    /// Wraps the given streams, checking that every index is in range.
    pub fn new(
        positions: &'a [[f32; 3]],
        normals: &'a [[f32; 3]],
        uvs: &'a [[f32; 2]],
        position_indices: &'a [u32],
        normal_indices: &'a [u32],
        uv_indices: &'a [u32],
    ) -> Result<Self, IndexedMeshError> {
        Self::with_ops(
            positions,
            normals,
            uvs,
            position_indices,
            normal_indices,
            uv_indices,
        )
    }
}

impl<'a, O: Ops> IndexedMesh<'a, O> {
    /// Same as `new`, for an explicit [`Ops`] backend.
    pub fn with_ops(
        positions: &'a [[f32; 3]],
        normals: &'a [[f32; 3]],
        uvs: &'a [[f32; 2]],
        position_indices: &'a [u32],
        normal_indices: &'a [u32],
        uv_indices: &'a [u32],
    ) -> Result<Self, IndexedMeshError> {
        let counts = [position_indices, normal_indices, uv_indices].map(<[u32]>::len);
        if counts[0] != counts[1] || counts[0] != counts[2] {
            return Err(IndexedMeshError::MismatchedIndexCounts {
                position: counts[0],
                normal: counts[1],
                uv: counts[2],
            });
        }

        if counts[0] % 3 != 0 {
            return Err(IndexedMeshError::IncompleteTriangle(counts[0]));
        }

        for (stream, indices, len) in [
            ("position", position_indices, positions.len()),
            ("normal", normal_indices, normals.len()),
            ("uv", uv_indices, uvs.len()),
        ] {
            if let Some((corner, &index)) = indices
                .iter()
                .enumerate()
                .find(|&(_, &index)| index as usize >= len)
            {
                return Err(IndexedMeshError::IndexOutOfRange {
                    triangle: corner / 3,
                    stream,
                    index,
                    len,
                });
            }
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            position_indices,
            normal_indices,
            uv_indices,
            _ops: PhantomData,
        })
    }
}

impl<O: Ops> TriangleInput<O> for IndexedMesh<'_, O> {
    fn triangle_count(&self) -> usize {
        self.position_indices.len() / 3
    }

    fn triangle_indices(&self, triangle: usize) -> TriangleIndices {
        let corners = |indices: &[u32]| [0, 1, 2].map(|i| indices[triangle * 3 + i]);

        TriangleIndices {
            position: corners(self.position_indices),
            normal: corners(self.normal_indices),
            uv: corners(self.uv_indices),
        }
    }

    fn position(&self, index: u32) -> [f32; 3] {
        self.positions[index as usize]
    }

    fn uv(&self, index: u32) -> [f32; 2] {
        self.uvs[index as usize]
    }

    fn normal(&self, triangle: usize, corner: usize) -> [f32; 3] {
        self.normals[self.normal_indices[triangle * 3 + corner] as usize]
    }
}
