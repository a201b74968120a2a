//! Use-Case-Funktionen der Kommandozeile.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert; die Engine
//! selbst rechnet nur.

use anyhow::{bail, Context, Result};
use glam::DVec2;
use serde::Serialize;
use std::path::Path;
use track_boundary_engine::{
    reconstruct, synthesize, trace_contours, Closure, Curve, Marker, Reconstruction, TrackLayout,
};

use crate::formats::{
    read_cone_file, read_graph_file, read_point_list, write_c_initializer, write_cone_file,
    ConeFile,
};
use crate::session::{updated_path, CleanupSession};
use crate::shared::ToolOptions;

/// Stützstellen je Randkurve im Kurven-Export.
const CURVE_EXPORT_SAMPLES: usize = 200;

/// Mittellinie (Punktliste) → Kegel-Datei.
pub fn synthesize_file(
    centerline_path: &Path,
    output_path: &Path,
    closure: Closure,
    options: &ToolOptions,
) -> Result<TrackLayout> {
    let raw = read_point_list(centerline_path)?;
    let centerline = options.input.prepare(&raw)?;
    let layout = synthesize(&centerline, closure, &options.engine)
        .with_context(|| format!("Synthese fehlgeschlagen: {}", centerline_path.display()))?;
    write_markers(output_path, &layout.markers, options)?;
    Ok(layout)
}

/// Randkonturen (Punktlisten) → Kegel-Datei.
pub fn trace_files(
    outer_path: &Path,
    inner_path: Option<&Path>,
    output_path: &Path,
    options: &ToolOptions,
) -> Result<TrackLayout> {
    let outer = read_point_list(outer_path)?;
    let inner = inner_path.map(read_point_list).transpose()?;
    let layout = trace_contours(&outer, inner.as_deref(), &options.engine)
        .with_context(|| format!("Konturen nicht verarbeitbar: {}", outer_path.display()))?;
    write_markers(output_path, &layout.markers, options)?;
    Ok(layout)
}

/// Abgetastete Randkurven einer Rekonstruktion.
#[derive(Debug, Serialize)]
struct BoundaryCurves {
    inner: Vec<[f64; 2]>,
    outer: Vec<[f64; 2]>,
}

/// SLAM-Graph-Dump → beschriftete Kegel (und optional die Randkurven als JSON).
pub fn reconstruct_file(
    graph_path: &Path,
    output_path: &Path,
    curves_path: Option<&Path>,
    options: &ToolOptions,
) -> Result<Reconstruction> {
    let graph = read_graph_file(graph_path)?;
    let result = reconstruct(&graph.detections(), &graph.pose_trail(), &options.engine)
        .with_context(|| format!("Rekonstruktion fehlgeschlagen: {}", graph_path.display()))?;
    write_markers(output_path, &result.markers, options)?;

    if let Some(path) = curves_path {
        let curves = BoundaryCurves {
            inner: sample_curve(result.inner_curve.as_ref()),
            outer: sample_curve(result.outer_curve.as_ref()),
        };
        let json = serde_json::to_string_pretty(&curves)?;
        std::fs::write(path, json)
            .with_context(|| format!("Randkurven nicht schreibbar: {}", path.display()))?;
        log::info!("Randkurven geschrieben nach: {}", path.display());
    }
    Ok(result)
}

fn sample_curve(curve: Option<&impl Curve>) -> Vec<[f64; 2]> {
    curve
        .map(|c| {
            c.resample_uniform(CURVE_EXPORT_SAMPLES)
                .into_iter()
                .map(|p| [p.x, p.y])
                .collect()
        })
        .unwrap_or_default()
}

/// Auswahl der zu entfernenden Kegel.
#[derive(Debug, Clone, Default)]
pub struct PruneSelection {
    /// Kegel-Indizes in der Datei
    pub indices: Vec<usize>,
    /// Klickpositionen; jeweils der nächste Kegel innerhalb von `radius`
    pub positions: Vec<DVec2>,
    pub radius: f64,
}

/// Entfernt ausgewählte Kegel und schreibt `<stem>_updated.<ext>`
/// (oder `output_path`). Gibt den Zielpfad zurück.
pub fn prune_file(
    cones_path: &Path,
    output_path: Option<&Path>,
    selection: &PruneSelection,
) -> Result<std::path::PathBuf> {
    let file = read_cone_file(cones_path)?;
    if file.cones.is_empty() {
        bail!("Keine Kegel in {}", cones_path.display());
    }
    let mut session = CleanupSession::new(file);

    for &index in &selection.indices {
        if index >= session.cones().len() {
            log::warn!("Kegel-Index {} ausserhalb der Liste, ignoriert", index);
            continue;
        }
        if !session.is_marked(index) {
            session.toggle(index);
        }
    }
    for &pos in &selection.positions {
        match session.pick_nearest(pos, selection.radius) {
            Some(index) if !session.is_marked(index) => {
                session.toggle(index);
            }
            Some(_) => {}
            None => log::warn!(
                "Kein Kegel innerhalb {:.2} um ({:.2}, {:.2})",
                selection.radius,
                pos.x,
                pos.y
            ),
        }
    }

    let target = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| updated_path(cones_path));
    write_cone_file(&target, &session.apply())?;
    Ok(target)
}

/// Kegel-Datei → C-Initialisierer.
pub fn export_c_file(
    cones_path: &Path,
    output_path: &Path,
    options: &ToolOptions,
) -> Result<usize> {
    let file = read_cone_file(cones_path)?;
    write_c_initializer(output_path, &file.cones, options.output.c_export_y_offset)?;
    Ok(file.cones.len())
}

/// Schreibt die Standard-Optionen, ohne eine bestehende Datei zu überschreiben.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Optionen-Datei existiert bereits: {}", path.display());
    }
    ToolOptions::default().save_to_file(path)
}

fn write_markers(path: &Path, markers: &[Marker], options: &ToolOptions) -> Result<()> {
    let placed = options.output.apply(markers)?;
    write_cone_file(path, &ConeFile::from_markers(&placed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("track_cones_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn synthesize_writes_cone_file() {
        let dir = temp_dir("use_case_synth");
        let input = dir.join("square.txt");
        std::fs::write(&input, "0 0\n40 0\n40 40\n0 40\n").unwrap();
        let output = dir.join("cones.yaml");

        let mut options = ToolOptions::default();
        options.engine.half_width = 2.0;
        let layout = synthesize_file(&input, &output, Closure::Closed, &options).unwrap();

        let file = read_cone_file(&output).unwrap();
        assert_eq!(file.cones.len(), layout.markers.len());
        assert!(file.cones.iter().any(|c| c.color == "blue"));
        assert!(file.cones.iter().any(|c| c.color == "yellow"));
    }

    #[test]
    fn prune_writes_updated_file() {
        let dir = temp_dir("use_case_prune");
        let input = dir.join("cones.json");
        std::fs::write(
            &input,
            r#"{"cones":[{"color":"blue","x":0,"y":0},{"color":"yellow","x":5,"y":0},{"color":"blue","x":10,"y":0}]}"#,
        )
        .unwrap();

        let selection = PruneSelection {
            indices: vec![0, 0, 7],
            positions: vec![DVec2::new(9.5, 0.2)],
            radius: 1.0,
        };
        let target = prune_file(&input, None, &selection).unwrap();
        assert_eq!(target, dir.join("cones_updated.json"));
        let left = read_cone_file(&target).unwrap();
        assert_eq!(left.cones.len(), 1);
        assert_eq!(left.cones[0].x, 5.0);
    }

    #[test]
    fn init_config_refuses_overwrite() {
        let dir = temp_dir("use_case_init");
        let path = dir.join("track_cones.toml");
        let _ = std::fs::remove_file(&path);
        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();
        assert_eq!(ToolOptions::load_from_file(&path).unwrap(), ToolOptions::default());
    }
}
