/// Integration-Tests für Dateiformate und die Use-Cases der Kommandozeile
use glam::DVec2;
use std::path::PathBuf;
use track_cones::engine::{Closure, Marker, Side};
use track_cones::formats::{
    format_c_initializer, read_cone_file, write_cone_file, ConeFile, ConeRecord,
};
use track_cones::use_cases;
use track_cones::ToolOptions;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("track_cones_it_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_markers() -> Vec<Marker> {
    vec![
        Marker::new(Side::Outer, DVec2::new(18.4878, 0.0375)),
        Marker::new(Side::Inner, DVec2::new(19.117, 3.0)),
        Marker::new(Side::Outer, DVec2::new(-2.5, 7.25)),
    ]
}

#[test]
fn test_cone_file_yaml_and_json_agree() {
    let dir = temp_dir("formats");
    let file = ConeFile::from_markers(&sample_markers());

    let yaml = dir.join("cones.yaml");
    let json = dir.join("cones.json");
    write_cone_file(&yaml, &file).unwrap();
    write_cone_file(&json, &file).unwrap();

    assert_eq!(read_cone_file(&yaml).unwrap(), file);
    assert_eq!(read_cone_file(&json).unwrap(), file);
    assert_eq!(read_cone_file(&yaml).unwrap().markers(), sample_markers());
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = temp_dir("formats_ext");
    let path = dir.join("cones.csv");
    assert!(write_cone_file(&path, &ConeFile::default()).is_err());
    assert!(read_cone_file(&dir.join("missing.yaml")).is_err());
}

#[test]
fn test_c_export_matches_simulator_layout() {
    let cones = vec![ConeRecord {
        color: "yellow".to_string(),
        x: 18.4878,
        y: 0.0375,
    }];
    let text = format_c_initializer(&cones, 10.0);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "points[0].x = 18.4878;");
    assert!(lines[1].starts_with("points[0].y = 10.037"));
    assert_eq!(lines[2], "points[0].color = giallo;");
    assert_eq!(lines[3], "");
}

#[test]
fn test_synthesize_then_export_c() {
    let dir = temp_dir("synth_export");
    let centerline = dir.join("centerline.txt");
    std::fs::write(
        &centerline,
        include_str!("fixtures/square_centerline.txt"),
    )
    .unwrap();
    let cones = dir.join("track.yml");
    let c_file = dir.join("track.c");

    let mut options = ToolOptions::default();
    options.output.scale = 0.5;
    options.output.shift_non_negative = true;

    let layout =
        use_cases::synthesize_file(&centerline, &cones, Closure::Closed, &options).unwrap();
    let written = read_cone_file(&cones).unwrap();
    assert_eq!(written.cones.len(), layout.markers.len());
    assert!(written.cones.iter().all(|c| c.x >= 0.0 && c.y >= 0.0));

    let count = use_cases::export_c_file(&cones, &c_file, &options).unwrap();
    assert_eq!(count, written.cones.len());
    let text = std::fs::read_to_string(&c_file).unwrap();
    assert_eq!(text.matches(".color = ").count(), count);
    assert!(text.contains("blu;") && text.contains("giallo;"));
}

#[test]
fn test_reconstruct_writes_curves() {
    let dir = temp_dir("reconstruct");
    let graph = dir.join("graph.txt");
    std::fs::write(&graph, include_str!("fixtures/graph_live_output.txt")).unwrap();
    let cones = dir.join("cones.json");
    let curves = dir.join("curves.json");

    let result =
        use_cases::reconstruct_file(&graph, &cones, Some(&curves), &ToolOptions::default())
            .unwrap();
    assert_eq!(read_cone_file(&cones).unwrap().cones.len(), result.markers.len());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&curves).unwrap()).unwrap();
    assert_eq!(value["inner"].as_array().unwrap().len(), 200);
    assert_eq!(value["outer"].as_array().unwrap().len(), 200);
}
