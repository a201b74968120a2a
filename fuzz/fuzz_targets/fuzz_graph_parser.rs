#![no_main]

use libfuzzer_sys::fuzz_target;
use track_cones::engine::{reconstruct, EngineParams};
use track_cones::formats::parse_graph;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let graph = parse_graph(content);
    // Rekonstruktion darf bei beliebigem Dump fehlschlagen, aber nie paniken
    let _ = reconstruct(&graph.detections(), &graph.pose_trail(), &EngineParams::default());
});
