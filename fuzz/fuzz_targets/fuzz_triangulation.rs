#![no_main]

use glam::IVec2;
use libfuzzer_sys::fuzz_target;
use pasture::mapgen::Triangulation;

fuzz_target!(|raw: Vec<(i16, i16)>| {
    // Cap inputs to keep the quadratic insertion fast
    if raw.len() > 256 {
        return;
    }
    let points: Vec<IVec2> = raw
        .iter()
        .map(|&(x, y)| IVec2::new(i32::from(x), i32::from(y)))
        .collect();

    let tri = Triangulation::new(&points);

    assert_eq!(tri.triangles().len(), tri.halfedges().len());
    for (e, twin) in tri.halfedges().iter().enumerate() {
        if let Some(twin) = *twin {
            assert_eq!(tri.halfedges()[twin], Some(e), "asymmetric half-edge {e}");
        }
    }
    for (a, b) in tri.edges() {
        assert!(tri.neighbors(a).contains(&b));
    }
    if tri.triangle_count() > 0 {
        assert!(tri.hull().len() >= 3);
    }
});
