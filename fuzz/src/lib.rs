use arbitrary::{Arbitrary, Unstructured};
use tangent_basis::{Options, TangentSpaceCalculation, TriangleIndices, TriangleInput};

/// Largest coordinate magnitude accepted, keeping squared lengths of edges and
/// their cross products finite.
const MAX_MAGNITUDE: f32 = 1e6;

#[derive(Debug, Clone, Copy, Arbitrary)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

#[derive(Debug, Clone)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[usize; 3]>,
}

impl Geometry {
    pub fn validate(&mut self) -> Result<(), arbitrary::Error> {
        let Self {
            vertices,
            triangles,
        } = self;

        if vertices.is_empty() || triangles.is_empty() {
            return Err(arbitrary::Error::IncorrectFormat);
        }

        for vertex in triangles.iter_mut().flatten() {
            *vertex %= vertices.len();
        }

        // Out of range: non-finite or huge values
        if vertices
            .iter()
            .flat_map(|vertex| {
                vertex
                    .position
                    .iter()
                    .copied()
                    .chain(vertex.normal)
                    .chain(vertex.tex_coord)
            })
            .any(|v| !v.is_finite() || v.abs() > MAX_MAGNITUDE)
        {
            return Err(arbitrary::Error::IncorrectFormat);
        }

        Ok(())
    }

    /// Runs a calculation and panics unless every corner ended up with an
    /// orthonormal base.
    pub fn check(&self, options: &Options) {
        let mut calculation = TangentSpaceCalculation::new();
        let diagnostics = calculation
            .calculate(self, options)
            .expect("fuzz inputs are far too small to exhaust memory");

        assert_eq!(calculation.triangle_count(), self.triangles.len());
        assert!(diagnostics.skipped() <= self.triangles.len());

        for triangle in 0..self.triangles.len() {
            let corners = calculation.triangle_base_indices(triangle).unwrap();
            for index in corners {
                let base = calculation.base(index).unwrap();
                let [u, v, n] = [base.tangent(), base.bitangent(), base.normal()];

                for axis in [u, v, n] {
                    assert!((dot(axis, axis) - 1.).abs() < 1e-3, "{base:?}");
                }
                assert!(dot(u, v).abs() < 1e-3, "{base:?}");
                assert!(dot(u, n).abs() < 1e-3, "{base:?}");
                assert!(dot(v, n).abs() < 1e-3, "{base:?}");
            }
        }
    }
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

impl Arbitrary<'_> for Geometry {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, arbitrary::Error> {
        let mut value = Self {
            vertices: Vec::<Vertex>::arbitrary(u)?,
            triangles: Vec::<[usize; 3]>::arbitrary(u)?,
        };

        value.validate()?;

        Ok(value)
    }
}

impl TriangleInput for Geometry {
    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn triangle_indices(&self, triangle: usize) -> TriangleIndices {
        let corners = self.triangles[triangle].map(|vertex| vertex as u32);

        TriangleIndices {
            position: corners,
            normal: corners,
            uv: corners,
        }
    }

    fn position(&self, index: u32) -> [f32; 3] {
        self.vertices[index as usize].position
    }

    fn uv(&self, index: u32) -> [f32; 2] {
        self.vertices[index as usize].tex_coord
    }

    fn normal(&self, triangle: usize, corner: usize) -> [f32; 3] {
        self.vertices[self.triangles[triangle][corner]].normal
    }
}
