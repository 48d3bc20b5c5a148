#![no_main]

use libfuzzer_sys::fuzz_target;
use tangent_basis::{Handedness, Options};
use tangent_basis_fuzz::Geometry;

fuzz_target!(|input: (Geometry, f32, [bool; 3])| {
    let (value, angular_threshold, [use_custom_normals, ignore_degeneracies, left]) = input;
    let angular_threshold = angular_threshold % 180.;

    value.check(&Options {
        use_custom_normals,
        ignore_degeneracies,
        split_threshold: angular_threshold.to_radians().cos(),
        handedness: if left {
            Handedness::Left
        } else {
            Handedness::Right
        },
        debug_mesh: false,
    });
});
