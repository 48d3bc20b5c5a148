mod accumulator;
mod base_index;
mod classify;
mod debug_mesh;
mod orthonormalize;
mod raw_basis;

use alloc::vec::Vec;

use self::{
    accumulator::BasisAccumulator,
    classify::{ClassifiedTriangle, classify_triangle},
    debug_mesh::debug_mesh,
    orthonormalize::orthonormalize,
    raw_basis::Contribution,
};
use crate::{
    Base, CalculateTangentSpaceError, Diagnostics, Ops, Options, TriangleInput,
    math::{Vec3, rotate},
};

/// Holds the result of a tangent space calculation: a table of [`Base`]s and,
/// for every input triangle, which base each of its corners uses.
///
/// Bases are indexed in order of creation, which only depends on the order of
/// the input triangles, so repeated calculations over the same input produce
/// identical tables.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TangentSpaceCalculation {
    triangle_bases: Vec<[usize; 3]>,
    bases: Vec<Base>,
}

impl TangentSpaceCalculation {
    /// Creates an empty calculation.
    pub const fn new() -> Self {
        Self {
            triangle_bases: Vec::new(),
            bases: Vec::new(),
        }
    }

    /// Calculates the tangent space of every vertex instance in `input`,
    /// replacing any previous result.
    ///
    /// Degenerate triangles are skipped and reported in the returned
    /// [`Diagnostics`]; their corners still receive a base.
    /// On error the result is left empty.
    pub fn calculate<I, O>(
        &mut self,
        input: &I,
        options: &Options,
    ) -> Result<Diagnostics, CalculateTangentSpaceError>
    where
        I: TriangleInput<O>,
        O: Ops,
    {
        self.triangle_bases.clear();
        self.bases.clear();

        let result = self.calculate_inner(input, options);
        if result.is_err() {
            self.triangle_bases = Vec::new();
            self.bases = Vec::new();
        }
        result
    }

    fn calculate_inner<I: TriangleInput<O>, O: Ops>(
        &mut self,
        input: &I,
        options: &Options,
    ) -> Result<Diagnostics, CalculateTangentSpaceError> {
        let triangle_count = input.triangle_count();
        let escalate = !options.ignore_degeneracies;
        let mut diagnostics = Diagnostics::new(triangle_count);

        if options.debug_mesh {
            debug_mesh(input);
        }

        let mut triangles = Vec::<ClassifiedTriangle<O>>::new();
        triangles.try_reserve_exact(triangle_count)?;
        for triangle in 0..triangle_count {
            let classified = classify_triangle(input, triangle);
            if let Err(degeneracy) = &classified.basis {
                diagnostics.record(triangle, *degeneracy, escalate);
            }
            triangles.push(classified);
        }

        // Typical closed meshes have about half as many vertices as triangles.
        let mut accumulator = BasisAccumulator::<O>::new();
        accumulator.try_reserve(triangle_count / 2 + 3)?;

        // Distribute the normals first, so that every vertex instance knows its
        // final normal before tangents are compared against it.
        for (t, triangle) in triangles.iter().enumerate() {
            for (corner, &key) in triangle.corners.iter().enumerate() {
                let handle = accumulator.find_or_create(key, || input.normal(t, corner))?;

                let Ok(basis) = &triangle.basis else {
                    continue;
                };

                let input_normal = Vec3::from(input.normal(t, corner));
                let normal = if options.use_custom_normals {
                    input_normal.normalized_or_zero()
                } else {
                    basis.oriented_normal(input_normal) * basis.corner_angles[corner]
                };
                accumulator.add_normal(handle, normal);
            }
        }

        // Then the tangents, splitting vertex instances where needed.
        self.triangle_bases.try_reserve_exact(triangle_count)?;
        for (t, triangle) in triangles.iter().enumerate() {
            let mut assignment = [0usize; 3];

            for (corner, &key) in triangle.corners.iter().enumerate() {
                let handle = accumulator.find_or_create(key, || input.normal(t, corner))?;

                let Ok(basis) = &triangle.basis else {
                    assignment[corner] = handle;
                    continue;
                };

                // face normal on the side the input normal points to
                let face_normal = basis.oriented_normal(Vec3::from(input.normal(t, corner)));

                let (u, v) = if options.use_custom_normals {
                    let n = accumulator.slot(handle).unit_normal();
                    (rotate(face_normal, n, basis.u), rotate(face_normal, n, basis.v))
                } else {
                    (basis.u, basis.v)
                };

                let weight = basis.corner_angles[corner];
                let contribution = Contribution {
                    u: u * weight,
                    v: v * weight,
                    mirrored: basis.is_mirrored_about(face_normal),
                };

                assignment[corner] = accumulator.add_contribution(
                    handle,
                    &contribution,
                    options.ignore_degeneracies,
                    options.split_threshold,
                )?;
            }

            self.triangle_bases.push(assignment);
        }

        let slots = accumulator.slots();
        let entries = accumulator.entries();
        self.bases.try_reserve_exact(entries.len())?;
        for entry in entries {
            let n = slots[entry.slot].unit_normal();
            let result = orthonormalize(&entry.raw, n, options.handedness);
            if result.is_fallback {
                diagnostics.record_fallback_base();
            }
            self.bases.push(result.base);
        }

        diagnostics.finish();

        log::debug!(
            "calculated {} base(s) for {} vertex instance(s) over {} triangle(s)",
            self.bases.len(),
            slots.len(),
            triangle_count
        );

        Ok(diagnostics)
    }

    /// Returns the number of computed bases.
    pub fn base_count(&self) -> usize {
        self.bases.len()
    }

    /// Returns the number of triangles of the last calculation.
    pub fn triangle_count(&self) -> usize {
        self.triangle_bases.len()
    }

    /// Returns, for each corner of `triangle`, the index of its [`Base`].
    pub fn triangle_base_indices(&self, triangle: usize) -> Option<[usize; 3]> {
        self.triangle_bases.get(triangle).copied()
    }

    /// Returns the [`Base`] at `index`.
    pub fn base(&self, index: usize) -> Option<&Base> {
        self.bases.get(index)
    }

    /// Returns all computed bases, in index order.
    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    /// Returns the [encoded tangent](Base::tangent_encoded) of every triangle
    /// corner, three per triangle in input order.
    pub fn corner_tangents_encoded(&self) -> Vec<[f32; 4]> {
        self.triangle_bases
            .iter()
            .flatten()
            .map(|&index| self.bases[index].tangent_encoded())
            .collect()
    }
}
