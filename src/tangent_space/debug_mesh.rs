use crate::{Ops, TriangleInput};

/// Dumps every triangle of `input` to the log at `trace` level.
///
/// Purely a troubleshooting aid; nothing here feeds into the calculation.
pub(super) fn debug_mesh<I: TriangleInput<O>, O: Ops>(input: &I) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }

    let triangles = input.triangle_count();
    log::trace!("debug mesh: {triangles} triangle(s)");

    for triangle in 0..triangles {
        let indices = input.triangle_indices(triangle);

        log::trace!(
            "triangle {triangle}: position {:?} normal {:?} uv {:?}",
            indices.position,
            indices.normal,
            indices.uv,
        );

        for corner in 0..3 {
            log::trace!(
                "  corner {corner}: p {:?} uv {:?} n {:?}",
                input.position(indices.position[corner]),
                input.uv(indices.uv[corner]),
                input.normal(triangle, corner),
            );
        }
    }
}
