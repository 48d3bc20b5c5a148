#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use tangent_basis::Options;
use tangent_basis_fuzz::{Geometry, Vertex};

#[derive(Debug)]
struct OneTriangle(Geometry);

impl Arbitrary<'_> for OneTriangle {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, arbitrary::Error> {
        let vertices = vec![
            Vertex::arbitrary(u)?,
            Vertex::arbitrary(u)?,
            Vertex::arbitrary(u)?,
        ];
        let triangles = vec![[0, 1, 2]];
        let mut value = Geometry {
            vertices,
            triangles,
        };

        value.validate()?;

        Ok(Self(value))
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        let (min, max) = Vertex::size_hint(depth);
        (3 * min, max.map(|max| 3 * max))
    }
}

fuzz_target!(|value: OneTriangle| {
    let OneTriangle(value) = value;

    value.check(&Options::default());
    value.check(&Options {
        use_custom_normals: true,
        ..Options::default()
    });
});
