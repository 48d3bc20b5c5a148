use crate::{Ops, math::Vec3};

/// Un-normalized, multiply-contributed tangent and bitangent of one base,
/// prior to [orthonormalization](super::orthonormalize).
pub(super) struct RawBasis<O: Ops> {
    /// Weighted sum of contributed tangents.
    pub(super) u: Vec3<O>,
    /// Weighted sum of contributed bitangents.
    pub(super) v: Vec3<O>,
    /// Whether the first contribution had a mirrored texture mapping.
    /// [`None`] until something has been contributed.
    pub(super) first_mirrored: Option<bool>,
}

impl<O: Ops> Copy for RawBasis<O> {}

impl<O: Ops> Clone for RawBasis<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: Ops> RawBasis<O> {
    pub(super) const ZERO: Self = Self {
        u: Vec3::ZERO,
        v: Vec3::ZERO,
        first_mirrored: None,
    };

    pub(super) fn is_empty(&self) -> bool {
        self.first_mirrored.is_none()
    }

    /// Adds a triangle corner's weighted tangent and bitangent.
    pub(super) fn add(&mut self, contribution: &Contribution<O>) {
        self.u += contribution.u;
        self.v += contribution.v;
        self.first_mirrored.get_or_insert(contribution.mirrored);
    }

    /// Decides if `contribution` can be merged into this basis without
    /// averaging opposite or diverging tangents.
    ///
    /// `n` is the unit normal of the vertex instance; tangents are compared
    /// after projecting them into its plane.
    pub(super) fn accepts(&self, contribution: &Contribution<O>, n: Vec3<O>, threshold: f32) -> bool {
        let Some(mirrored) = self.first_mirrored else {
            return true;
        };

        if mirrored != contribution.mirrored {
            return false;
        }

        let [a, b] = [self.u, contribution.u].map(|u| u.reject_from_normalized(n).normalized_or_zero());

        a.dot(b) >= threshold
    }
}

/// The share of one triangle corner in the basis of its vertex instance.
pub(super) struct Contribution<O: Ops> {
    /// Unit tangent scaled by the corner weight.
    pub(super) u: Vec3<O>,
    /// Unit bitangent scaled by the corner weight.
    pub(super) v: Vec3<O>,
    pub(super) mirrored: bool,
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::StdOps;

    type V = Vec3<StdOps>;

    fn contribution(u: V, v: V, mirrored: bool) -> Contribution<StdOps> {
        Contribution { u, v, mirrored }
    }

    #[test]
    fn empty_accepts_anything() {
        let raw = RawBasis::<StdOps>::ZERO;
        assert!(raw.is_empty());
        assert!(raw.accepts(&contribution(V::X, -V::Y, true), V::Z, 1.0));
    }

    #[test]
    fn opposite_handedness_is_rejected() {
        let mut raw = RawBasis::<StdOps>::ZERO;
        raw.add(&contribution(V::X, V::Y, false));

        assert!(!raw.accepts(&contribution(-V::X, V::Y, true), V::Z, -1.0));
        assert!(raw.accepts(&contribution(V::X, V::Y, false), V::Z, -1.0));
    }

    #[test]
    fn threshold_splits_diverging_tangents() {
        let mut raw = RawBasis::<StdOps>::ZERO;
        raw.add(&contribution(V::X, V::Y, false));

        // 90 degrees apart in the normal plane
        let turned = contribution(V::Y, -V::X, false);
        assert!(raw.accepts(&turned, V::Z, -1.0));
        assert!(!raw.accepts(&turned, V::Z, 0.5));
    }

    #[test]
    fn contributions_sum() {
        let mut raw = RawBasis::<StdOps>::ZERO;
        raw.add(&contribution(V::X * 0.5, V::Y * 0.5, false));
        raw.add(&contribution(V::X, V::Y, false));

        assert_eq!(raw.u, V::new(1.5, 0., 0.));
        assert_eq!(raw.v, V::new(0., 1.5, 0.));
        assert_eq!(raw.first_mirrored, Some(false));
    }
}
