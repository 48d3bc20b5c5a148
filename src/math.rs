use core::{
    marker::PhantomData,
    ops::{Add, AddAssign, Mul, Neg, Sub},
};

/// Provides the math operations required by the basis calculation but which
/// aren't included in Rust's [`core`] crate.
/// With the `std` feature enabled, a (default) implementation is provided.
pub trait Ops {
    /// Provides a [`sqrt`] implementation for [`f32`].
    ///
    /// [`sqrt`]: https://doc.rust-lang.org/stable/std/primitive.f32.html#method.sqrt
    fn sqrt(x: f32) -> f32;

    /// Provides a [`acos`] implementation for [`f32`].
    ///
    /// [`acos`]: https://doc.rust-lang.org/stable/std/primitive.f32.html#method.acos
    fn acos(x: f32) -> f32;
}

pub(crate) struct Vec3<O: Ops> {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) z: f32,
    pub(crate) _phantom: PhantomData<O>,
}

impl<O: Ops> Copy for Vec3<O> {}

impl<O: Ops> Clone for Vec3<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: Ops> core::fmt::Debug for Vec3<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl<O: Ops> From<[f32; 3]> for Vec3<O> {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl<O: Ops> From<Vec3<O>> for [f32; 3] {
    fn from(Vec3 { x, y, z, .. }: Vec3<O>) -> Self {
        [x, y, z]
    }
}

impl<O: Ops> Vec3<O> {
    pub(crate) const ZERO: Vec3<O> = Vec3::new(0., 0., 0.);
    pub(crate) const X: Vec3<O> = Vec3::new(1., 0., 0.);
    pub(crate) const Y: Vec3<O> = Vec3::new(0., 1., 0.);
    pub(crate) const Z: Vec3<O> = Vec3::new(0., 0., 1.);

    pub(crate) const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            _phantom: PhantomData,
        }
    }

    pub(crate) fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub(crate) fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub(crate) fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub(crate) fn length(self) -> f32 {
        O::sqrt(self.length_squared())
    }

    /// Returns the unit vector in the direction of `self`, or [`None`] if the
    /// length underflows (or is not finite).
    pub(crate) fn try_normalize(self) -> Option<Self> {
        let length_squared = self.length_squared();
        if length_squared.is_finite() && not_zero(length_squared) {
            Some(self * O::sqrt(length_squared).recip())
        } else {
            None
        }
    }

    pub(crate) fn normalized_or_zero(self) -> Self {
        self.try_normalize().unwrap_or(Self::ZERO)
    }

    /// Removes the component of `self` parallel to the unit vector `n`.
    pub(crate) fn reject_from_normalized(self, n: Self) -> Self {
        self - n.dot(self) * n
    }

    /// Angle in radians between `self` and `rhs`, or `0` if either vanishes.
    pub(crate) fn angle_between(self, rhs: Self) -> f32 {
        match (self.try_normalize(), rhs.try_normalize()) {
            (Some(a), Some(b)) => O::acos(a.dot(b).clamp(-1f32, 1f32)),
            _ => 0f32,
        }
    }

    /// Returns a unit vector perpendicular to the unit vector `self`, built
    /// from the world axis least parallel to it.
    pub(crate) fn any_orthonormal(self) -> Self {
        let [ax, ay, az] = [self.x, self.y, self.z].map(fabsf);
        let axis = if ax <= ay && ax <= az {
            Self::X
        } else if ay <= az {
            Self::Y
        } else {
            Self::Z
        };
        axis.reject_from_normalized(self).normalized_or_zero()
    }
}

/// Rotates `input` by the rotation which carries the unit vector `from` onto
/// the unit vector `to` (Rodrigues' formula).
///
/// When `from` and `to` are opposite the axis is ambiguous, so any axis
/// perpendicular to `from` is used.
pub(crate) fn rotate<O: Ops>(from: Vec3<O>, to: Vec3<O>, input: Vec3<O>) -> Vec3<O> {
    let cos = from.dot(to).clamp(-1f32, 1f32);
    let axis = from.cross(to);

    match axis.try_normalize() {
        Some(k) => {
            let sin = axis.length();
            input * cos + k.cross(input) * sin + k * (k.dot(input) * (1f32 - cos))
        }
        // parallel
        None if cos > 0f32 => input,
        // anti-parallel, half turn around any perpendicular axis
        None => {
            let k = from.any_orthonormal();
            2f32 * k.dot(input) * k - input
        }
    }
}

impl<O: Ops> Add for Vec3<O> {
    type Output = Vec3<O>;

    fn add(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<O: Ops> AddAssign for Vec3<O> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<O: Ops> Sub for Vec3<O> {
    type Output = Vec3<O>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<O: Ops> Mul<f32> for Vec3<O> {
    type Output = Vec3<O>;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec3::new(rhs * self.x, rhs * self.y, rhs * self.z)
    }
}

impl<O: Ops> Mul<Vec3<O>> for f32 {
    type Output = Vec3<O>;

    fn mul(self, rhs: Vec3<O>) -> Self::Output {
        rhs * self
    }
}

impl<O: Ops> PartialEq for Vec3<O> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl<O: Ops> Neg for Vec3<O> {
    type Output = Vec3<O>;

    fn neg(self) -> Self::Output {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

pub(crate) fn fabsf(x: f32) -> f32 {
    if x.is_sign_negative() { -x } else { x }
}

pub(crate) fn not_zero(x: f32) -> bool {
    fabsf(x) > f32::MIN_POSITIVE
}
