/// Integration-Tests für Freihand-Strich und manuelle Bereinigung
use glam::DVec2;
use std::f64::consts::TAU;
use track_cones::engine::{synthesize, Closure, EngineParams, Side};
use track_cones::{CleanupSession, ConeFile, StrokeSession};

#[test]
fn test_stroke_session_feeds_synthesis() {
    let mut stroke = StrokeSession::new();
    stroke.begin(DVec2::new(100.0, 0.0));
    for i in 1..60 {
        let a = TAU * i as f64 / 60.0;
        stroke.extend(DVec2::new(a.cos(), a.sin()) * 100.0);
        // Stillstand und Ausreisser ausserhalb der Zeichenfläche
        stroke.extend(DVec2::new(a.cos(), a.sin()) * 100.0);
        stroke.extend(DVec2::new(f64::INFINITY, 0.0));
    }
    stroke.end();
    assert_eq!(stroke.points().len(), 60);

    let centerline = stroke.into_centerline(Closure::default()).unwrap();
    let layout = synthesize(centerline.vertices(), Closure::Closed, &EngineParams::default())
        .unwrap();
    assert!(layout.count(Side::Inner) > 100);
    assert!(layout.count(Side::Outer) > layout.count(Side::Inner));
}

#[test]
fn test_cleanup_session_removes_picked_cones() {
    let markers = synthesize(
        &[
            DVec2::new(0.0, 0.0),
            DVec2::new(30.0, 0.0),
            DVec2::new(30.0, 30.0),
            DVec2::new(0.0, 30.0),
        ],
        Closure::Closed,
        &EngineParams::default(),
    )
    .unwrap()
    .markers;
    let file = ConeFile::from_markers(&markers);
    let total = file.cones.len();

    let mut session = CleanupSession::new(file);
    let picked = session.toggle_nearest(markers[0].position, 0.5).unwrap();
    assert_eq!(picked, 0);
    assert!(session.is_marked(0));
    // Zweiter Klick an derselben Stelle hebt die Markierung auf
    session.toggle_nearest(markers[0].position, 0.5);
    assert!(!session.is_marked(0));

    session.toggle(1);
    session.toggle(2);
    assert!(session.pick_nearest(DVec2::new(500.0, 500.0), 1.0).is_none());

    let cleaned = session.apply();
    assert_eq!(cleaned.cones.len(), total - 2);
    assert_eq!(cleaned.cones[0].position(), markers[0].position);
    assert_eq!(cleaned.cones[1].position(), markers[3].position);
}
