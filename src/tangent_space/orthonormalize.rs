use super::raw_basis::RawBasis;
use crate::{Base, Handedness, Ops, math::Vec3};

/// Squared sine below which a projected tangent is considered to have vanished
/// relative to its original length.
const VANISHED_RATIO_SQUARED: f32 = 1e-10;

pub(super) struct Orthonormalized {
    pub(super) base: Base,
    /// No contributed tangent or bitangent survived projection, so the tangent
    /// was picked arbitrarily.
    pub(super) is_fallback: bool,
}

/// Converts an accumulated [`RawBasis`] into an orthonormal frame around the
/// unit normal `n`.
pub(super) fn orthonormalize<O: Ops>(
    raw: &RawBasis<O>,
    n: Vec3<O>,
    handedness: Handedness,
) -> Orthonormalized {
    let is_mirrored = match raw.u.cross(raw.v).dot(n) {
        s if s < 0f32 => true,
        s if s > 0f32 => false,
        // opposite contributions cancelled out, keep the first one's
        _ => raw.first_mirrored.unwrap_or(false),
    };

    let sign = match (handedness, is_mirrored) {
        (Handedness::Right, false) | (Handedness::Left, true) => 1f32,
        (Handedness::Right, true) | (Handedness::Left, false) => -1f32,
    };

    // v = sign * (n x u), so u = sign * (v x n)
    let from_u = || project(raw.u, n);
    let from_v = || project(raw.v, n).map(|v| sign * v.cross(n));

    let (u, is_fallback) = match from_u().or_else(from_v) {
        Some(u) => (u, false),
        None => (n.any_orthonormal(), true),
    };
    let v = sign * n.cross(u);

    let base = Base {
        u: u.into(),
        v: v.into(),
        n: n.into(),
        is_mirrored,
    };

    #[cfg(tangent_basis_more_assertions)]
    {
        let [u, v, n] = [base.u, base.v, base.n].map(Vec3::<O>::from);
        for axis in [u, v, n] {
            assert!((axis.length() - 1f32).abs() < 1e-4);
        }
        assert!(u.dot(v).abs() < 1e-4);
        assert!(u.dot(n).abs() < 1e-4);
        assert!(v.dot(n).abs() < 1e-4);
    }

    Orthonormalized { base, is_fallback }
}

/// Projects `a` into the plane of the unit normal `n` and normalizes it, or
/// returns [`None`] if nothing meaningful is left.
fn project<O: Ops>(a: Vec3<O>, n: Vec3<O>) -> Option<Vec3<O>> {
    let projected = a.reject_from_normalized(n);
    if projected.length_squared() > VANISHED_RATIO_SQUARED * a.length_squared() {
        projected.try_normalize()
    } else {
        None
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::StdOps;

    type V = Vec3<StdOps>;

    fn raw(u: V, v: V, first_mirrored: Option<bool>) -> RawBasis<StdOps> {
        RawBasis {
            u,
            v,
            first_mirrored,
        }
    }

    fn assert_orthonormal(base: &Base) {
        let [u, v, n] = [base.u, base.v, base.n].map(V::from);
        for axis in [u, v, n] {
            assert!((axis.length() - 1.).abs() < 1e-4, "{axis:?}");
        }
        assert!(u.dot(v).abs() < 1e-4);
        assert!(u.dot(n).abs() < 1e-4);
        assert!(v.dot(n).abs() < 1e-4);
    }

    #[test]
    fn skewed_input_becomes_orthonormal() {
        let result = orthonormalize(
            &raw(V::new(2., 0.1, 0.4), V::new(0.2, 1., -0.1), Some(false)),
            V::Z,
            Handedness::Right,
        );

        assert!(!result.is_fallback);
        assert!(!result.base.is_mirrored());
        assert_orthonormal(&result.base);
        assert!(result.base.u[0] > 0.99);
        assert!(result.base.v[1] > 0.99);
    }

    #[test]
    fn mirrored_flips_bitangent() {
        let result = orthonormalize(&raw(-V::X, V::Y, Some(true)), V::Z, Handedness::Right);

        assert!(result.base.is_mirrored());
        assert_eq!(result.base.tangent_encoded()[3], -1.);
        assert_orthonormal(&result.base);
        assert!((V::from(result.base.v) - V::Y).length() < 1e-5);
    }

    #[test]
    fn left_handed_convention() {
        let result = orthonormalize(&raw(V::X, V::Y, Some(false)), V::Z, Handedness::Left);

        assert!((V::from(result.base.v) + V::Y).length() < 1e-5);
        assert_orthonormal(&result.base);
    }

    #[test]
    fn tangent_parallel_to_normal_uses_bitangent() {
        let result = orthonormalize(&raw(V::Z, V::Y, Some(false)), V::Z, Handedness::Right);

        assert!(!result.is_fallback);
        assert!((V::from(result.base.u) - V::X).length() < 1e-5);
        assert!((V::from(result.base.v) - V::Y).length() < 1e-5);
    }

    #[test]
    fn nothing_usable_falls_back() {
        let result = orthonormalize(&RawBasis::ZERO, V::Y, Handedness::Right);

        assert!(result.is_fallback);
        assert!(!result.base.is_mirrored());
        assert_orthonormal(&result.base);
        assert_eq!(result.base.n, [0., 1., 0.]);
    }
}
