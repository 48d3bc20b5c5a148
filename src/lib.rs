//! Computes a per-vertex tangent space basis (tangent, bitangent and normal)
//! for triangulated meshes, in entirely safe and idiomatic Rust.
//!
//! The result is what a mesh compiler packs into the vertex stream so that
//! normal maps can be transformed from texture space into object space.
//!
//! # Usage
//!
//! As a preliminary step for `no_std` users, you must provide an implementation
//! for [`Ops`].
//! When the `std` feature is enabled, one is provided and automatically selected
//! as the default.
//!
//! First, implement [`TriangleInput`] for your mesh, or wrap your index and
//! attribute buffers in an [`IndexedMesh`].
//!
//! ```
//! use tangent_basis::{IndexedMesh, Options, calculate_tangent_space};
//!
//! let positions = [[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.]];
//! let uvs = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
//! let normals = [[0., 0., 1.]];
//! let corners = [0, 1, 2, 0, 2, 3];
//!
//! let mesh = IndexedMesh::new(&positions, &normals, &uvs, &corners, &[0; 6], &corners)?;
//! let (calculation, diagnostics) = calculate_tangent_space(&mesh, &Options::default())?;
//!
//! assert!(diagnostics.is_clean());
//! assert_eq!(calculation.base_count(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Description
//!
//! Every unique `(position index, normal index)` pair referenced by a triangle
//! corner is a vertex instance and receives one [`Base`].
//! All triangles sharing a vertex instance contribute to its basis, weighted by
//! the angle the triangle spans at that corner.
//!
//! Texture mappings are frequently mirrored for symmetric models.
//! Averaging a mirrored and a non-mirrored tangent would produce garbage, so
//! contributions with opposite handedness are kept in separate bases even when
//! they share position and normal.
//! [`Options::split_threshold`] can additionally split contributions whose
//! tangents diverge too much.
//!
//! Degenerate triangles (collapsed corners, zero area in object space, or
//! zero area in texture space) never abort the calculation.
//! They are skipped, counted in the returned [`Diagnostics`], and their corners
//! inherit whatever basis their neighbors produce.
//! A vertex with no usable neighbor receives a fallback basis built around its
//! normal.
//! Only failing to allocate storage is fatal.
//!
//! # Features
//!
//! ## `std` (default)
//!
//! Provides access to the standard library, allowing a default implementation
//! of [`Ops`] to be provided.
//! If you disable this feature, you will need to provide a type implementing
//! [`Ops`] as the `O` parameter in the [`TriangleInput`] trait.
//!
//! A common backend for implementing [`Ops`] is [`libm`]:
//!
//! ```
//! # use tangent_basis::Ops;
//! # struct LibmOps;
//! impl Ops for LibmOps {
//!     fn sqrt(x: f32) -> f32 {
//!         libm::sqrtf(x)
//!     }
//!
//!     fn acos(x: f32) -> f32 {
//!         libm::acos(x as f64) as f32
//!     }
//! }
//! ```
//!
//! # Logging
//!
//! Diagnostics are emitted through the [`log`] facade.
//! Skipped triangles are logged at `debug`, a summary of a run with problems at
//! `warn`, and the [`Options::debug_mesh`] dump at `trace`.
//! No logger is installed by this crate.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

mod error;
mod math;
mod mesh;
mod tangent_space;

#[cfg(all(test, feature = "std"))]
mod tests;

#[cfg(feature = "std")]
mod std {
    extern crate std;

    /// Implements [`Ops`](crate::Ops) using the standard library.
    /// This is the recommended default when the `std` feature is enabled.
    pub struct StdOps;

    impl crate::Ops for StdOps {
        #[inline]
        fn sqrt(x: f32) -> f32 {
            x.sqrt()
        }

        #[inline]
        fn acos(x: f32) -> f32 {
            // Using f64::acos for added precision on the corner weights.
            (x as f64).acos() as f32
        }
    }
}

pub use error::{
    CalculateTangentSpaceError, Degeneracy, Diagnostics, ErrorCode, IndexedMeshError,
};
pub use math::Ops;
pub use mesh::IndexedMesh;
pub use tangent_space::TangentSpaceCalculation;

#[cfg(feature = "std")]
pub use std::StdOps;

/// Calculates the tangent space of `input` into a fresh
/// [`TangentSpaceCalculation`].
///
/// This is a shorthand for [`TangentSpaceCalculation::new`] followed by
/// [`TangentSpaceCalculation::calculate`].
pub fn calculate_tangent_space<I, O>(
    input: &I,
    options: &Options,
) -> Result<(TangentSpaceCalculation, Diagnostics), CalculateTangentSpaceError>
where
    I: TriangleInput<O>,
    O: Ops,
{
    let mut calculation = TangentSpaceCalculation::new();
    let diagnostics = calculation.calculate(input, options)?;
    Ok((calculation, diagnostics))
}

/// Provides read-only access to a triangulated mesh.
///
/// Positions, normals and texture coordinates live in independent streams, each
/// with its own index per triangle corner.
/// A vertex instance is identified by its position index _and_ normal index, so
/// hard edges (same position, different normal) produce separate bases.
///
/// Without the `std` feature, there is no default implementation for [`Ops`]
/// provided.
/// Instead, you must also provide a type implementing [`Ops`] using an alternative
/// math backend, such as [`libm`].
///
/// [`libm`]: https://docs.rs/libm
pub trait TriangleInput<
    #[cfg(not(feature = "std"))] O: Ops,
    #[cfg(feature = "std")] O: Ops = std::StdOps,
>
{
    /// Returns the number of triangles to be processed.
    fn triangle_count(&self) -> usize;

    /// Returns the stream indices of each corner of `triangle`.
    /// `triangle` is a number in the range `0..triangle_count()`.
    fn triangle_indices(&self, triangle: usize) -> TriangleIndices;

    /// Returns the position stored at `index` of the position stream.
    fn position(&self, index: u32) -> [f32; 3];

    /// Returns the texture coordinate stored at `index` of the UV stream.
    fn uv(&self, index: u32) -> [f32; 2];

    /// Returns the normal of `corner` (in the range `0..=2`) on `triangle`.
    ///
    /// Only consulted when [`Options::use_custom_normals`] is set, or when a
    /// vertex has no usable geometric normal.
    fn normal(&self, triangle: usize, corner: usize) -> [f32; 3];
}

/// Indices into the position, normal, and UV streams for the three corners of
/// a triangle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TriangleIndices {
    pub position: [u32; 3],
    pub normal: [u32; 3],
    pub uv: [u32; 3],
}

/// An orthonormal tangent space frame for one vertex instance.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Base {
    pub(crate) u: [f32; 3],
    pub(crate) v: [f32; 3],
    pub(crate) n: [f32; 3],
    pub(crate) is_mirrored: bool,
}

impl Default for Base {
    fn default() -> Self {
        Self {
            u: [1., 0., 0.],
            v: [0., 1., 0.],
            n: [0., 0., 1.],
            is_mirrored: false,
        }
    }
}

impl Base {
    /// Returns the normalized tangent (texture `u` direction) as an `[x, y, z]` array.
    #[inline]
    pub const fn tangent(&self) -> [f32; 3] {
        self.u
    }

    /// Returns the normalized bitangent (texture `v` direction) as an `[x, y, z]` array.
    #[inline]
    pub const fn bitangent(&self) -> [f32; 3] {
        self.v
    }

    /// Returns the normal of this vertex instance as an `[x, y, z]` array.
    #[inline]
    pub const fn normal(&self) -> [f32; 3] {
        self.n
    }

    /// Indicates the texture mapping around this vertex is mirrored, which
    /// flips the bitangent relative to the configured [`Handedness`].
    #[inline]
    pub const fn is_mirrored(&self) -> bool {
        self.is_mirrored
    }

    /// Returns the tangent with the bitangent sign in the 'W' (4th) component,
    /// as stored in vertex streams.
    /// The bitangent can be reconstructed as `w * cross(n, t)` under
    /// [`Handedness::Right`], or `w * cross(t, n)` under [`Handedness::Left`].
    #[inline]
    pub const fn tangent_encoded(&self) -> [f32; 4] {
        let sign = if self.is_mirrored { -1.0 } else { 1.0 };
        [self.u[0], self.u[1], self.u[2], sign]
    }
}

/// Which way the bitangent of an unmirrored frame points.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Handedness {
    /// `bitangent = cross(normal, tangent)`, so `(t, b, n)` is right-handed.
    #[default]
    Right,
    /// `bitangent = cross(tangent, normal)`, so `(t, b, n)` is left-handed.
    Left,
}

/// Settings for a [`TangentSpaceCalculation`].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Options {
    /// Use the normals supplied by [`TriangleInput::normal`] instead of
    /// angle-weighted face normals.
    /// Triangle tangents are rotated onto the supplied normal before merging.
    pub use_custom_normals: bool,
    /// Merge every contribution to a vertex instance into a single base and do
    /// not raise the returned [`ErrorCode`] for degenerate triangles.
    /// Degeneracies are still counted in [`Diagnostics`].
    pub ignore_degeneracies: bool,
    /// Linear threshold (cosine of the angle) below which two tangents of the
    /// same handedness are kept in separate bases.
    /// The default of `-1` only splits on mirroring.
    ///
    /// ```ignore
    /// let angular_threshold = 90_f32;
    /// let split_threshold = angular_threshold.to_radians().cos();
    /// ```
    pub split_threshold: f32,
    /// Orientation convention of the produced frames.
    pub handedness: Handedness,
    /// Dump the input mesh to the log at `trace` level before calculating.
    pub debug_mesh: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_custom_normals: false,
            ignore_degeneracies: false,
            split_threshold: -1.0,
            handedness: Handedness::Right,
            debug_mesh: false,
        }
    }
}
