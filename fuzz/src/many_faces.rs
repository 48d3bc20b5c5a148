#![no_main]

use libfuzzer_sys::fuzz_target;
use tangent_basis::Options;
use tangent_basis_fuzz::Geometry;

fuzz_target!(|value: Geometry| {
    value.check(&Options::default());
});
