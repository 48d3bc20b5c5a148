//! Derives the raw tangent frame of a single triangle from its UV gradients,
//! or the reason it has none.

use super::base_index::BaseIndex;
use crate::{
    Degeneracy, Ops, TriangleInput,
    math::{Vec3, fabsf},
};

/// First-order tangent frame of a healthy triangle.
pub(super) struct TriangleBasis<O: Ops> {
    /// Normalized object-space direction of increasing texture `u`.
    pub(super) u: Vec3<O>,
    /// Normalized object-space direction of increasing texture `v`.
    pub(super) v: Vec3<O>,
    /// Normalized geometric face normal, following the winding order.
    pub(super) n: Vec3<O>,
    /// Angle spanned at each corner, used to weight the corner's contribution.
    pub(super) corner_angles: [f32; 3],
}

pub(super) struct ClassifiedTriangle<O: Ops> {
    pub(super) corners: [BaseIndex; 3],
    pub(super) basis: Result<TriangleBasis<O>, Degeneracy>,
}

pub(super) fn classify_triangle<I: TriangleInput<O>, O: Ops>(
    input: &I,
    triangle: usize,
) -> ClassifiedTriangle<O> {
    let indices = input.triangle_indices(triangle);
    let corners = BaseIndex::corners(&indices);

    let basis = if BaseIndex::any_shared(&corners) {
        Err(Degeneracy::VerticesSharingCoordinates)
    } else {
        let p = indices.position.map(|i| Vec3::<O>::from(input.position(i)));
        let tx = indices.uv.map(|i| input.uv(i));
        triangle_basis(p, tx)
    };

    ClassifiedTriangle {
        corners,
        basis,
    }
}

/// Solves the 2x2 system relating object-space edges to texture-space edges.
fn triangle_basis<O: Ops>(p: [Vec3<O>; 3], tx: [[f32; 2]; 3]) -> Result<TriangleBasis<O>, Degeneracy> {
    let d_v = [1, 2].map(|i| p[i] - p[0]);
    let d_tx = [1, 2].map(|t| [0, 1].map(|i| tx[t][i] - tx[0][i]));

    // twice the area, relative to the edge lengths so that the test is scale
    // independent
    let face = d_v[0].cross(d_v[1]);
    let face_length_squared = face.length_squared();
    let edge_scale = d_v[0].length_squared() * d_v[1].length_squared();
    if !(face_length_squared > f32::EPSILON * f32::EPSILON * edge_scale) {
        return Err(Degeneracy::AllVerticesOnTheSameVector);
    }
    let n = face * O::sqrt(face_length_squared).recip();

    let lhs = d_tx[0][0] * d_tx[1][1];
    let rhs = d_tx[1][0] * d_tx[0][1];
    let signed_area_double = lhs - rhs;
    if !(fabsf(signed_area_double) > f32::EPSILON * (fabsf(lhs) + fabsf(rhs))) {
        return Err(Degeneracy::BrokenTextureCoordinates);
    }

    let inverse = signed_area_double.recip();
    let u = (d_tx[1][1] * d_v[0] - d_tx[0][1] * d_v[1]) * inverse;
    let v = (d_tx[0][0] * d_v[1] - d_tx[1][0] * d_v[0]) * inverse;

    let (Some(u), Some(v)) = (u.try_normalize(), v.try_normalize()) else {
        return Err(Degeneracy::BrokenTextureCoordinates);
    };

    let corner_angles = [0, 1, 2].map(|i| {
        let [prev, next] = [2, 1].map(|j| p[(i + j) % 3] - p[i]);
        next.angle_between(prev)
    });

    Ok(TriangleBasis {
        u,
        v,
        n,
        corner_angles,
    })
}

impl<O: Ops> TriangleBasis<O> {
    /// Returns the face normal flipped to the side of `reference`, so that
    /// the winding order of the triangle does not matter.
    /// A `reference` perpendicular to the face (or zero) keeps the winding.
    pub(super) fn oriented_normal(&self, reference: Vec3<O>) -> Vec3<O> {
        if self.n.dot(reference) < 0f32 {
            -self.n
        } else {
            self.n
        }
    }

    /// Returns `true` if the texture mapping is mirrored when seen from the
    /// side `n` points to, flipping the handedness of its tangent frame.
    pub(super) fn is_mirrored_about(&self, n: Vec3<O>) -> bool {
        self.u.cross(self.v).dot(n) < 0f32
    }
}
