#![no_main]

use libfuzzer_sys::fuzz_target;
use track_cones::engine::{synthesize, Closure, EngineParams};
use track_cones::formats::parse_point_list;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(points) = parse_point_list(content) {
        let _ = synthesize(&points, Closure::default(), &EngineParams::default());
    }
});
