//! Parser für den Graph-Dump des SLAM-Moduls.
//!
//! Aufbau: Abschnitte `Poses:`, `Landmarks:`, `Measurements:`, darunter je
//! eine Zeile pro Eintrag mit Leerzeichen-getrennten Feldern:
//!
//! ```text
//! Poses:
//! <id> <x> <y> <theta>
//! Landmarks:
//! <id> <x> <y> [<typ>]
//! Measurements:
//! <pose_id> <landmark_id> <range> <bearing>
//! ```
//!
//! Fehlerhafte Zeilen werden übersprungen (der Dump wird live geschrieben
//! und kann eine abgeschnittene letzte Zeile enthalten).

use anyhow::{Context, Result};
use glam::DVec2;
use std::path::Path;

/// Fahrzeugpose.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub id: u32,
    pub position: DVec2,
    pub heading: f64,
}

/// Erkannter Kegel (Landmarke).
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub id: u32,
    pub position: DVec2,
    /// Farbtyp in Kleinbuchstaben, falls im Dump vorhanden
    pub kind: Option<String>,
}

/// Messkante Pose → Landmarke.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub pose_id: u32,
    pub landmark_id: u32,
    pub range: f64,
    pub bearing: f64,
}

/// Inhalt eines Graph-Dumps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlamGraph {
    pub poses: Vec<Pose>,
    pub landmarks: Vec<Landmark>,
    pub measurements: Vec<Measurement>,
    /// Anzahl übersprungener Zeilen
    pub skipped_lines: usize,
}

impl SlamGraph {
    /// Fahrspur in Dump-Reihenfolge.
    pub fn pose_trail(&self) -> Vec<DVec2> {
        self.poses.iter().map(|p| p.position).collect()
    }

    /// Positionen aller Landmarken in Dump-Reihenfolge.
    pub fn detections(&self) -> Vec<DVec2> {
        self.landmarks.iter().map(|l| l.position).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GraphSection {
    Poses,
    Landmarks,
    Measurements,
}

/// Parst einen Graph-Dump. Schlägt nie fehl; Unlesbares wird gezählt.
pub fn parse_graph(content: &str) -> SlamGraph {
    let mut graph = SlamGraph::default();
    let mut section: Option<GraphSection> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line {
            "Poses:" => {
                section = Some(GraphSection::Poses);
                continue;
            }
            "Landmarks:" => {
                section = Some(GraphSection::Landmarks);
                continue;
            }
            "Measurements:" => {
                section = Some(GraphSection::Measurements);
                continue;
            }
            _ => {}
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let accepted = match section {
            Some(GraphSection::Poses) => push_parsed(&mut graph.poses, parse_pose(&fields)),
            Some(GraphSection::Landmarks) => {
                push_parsed(&mut graph.landmarks, parse_landmark(&fields))
            }
            Some(GraphSection::Measurements) => {
                push_parsed(&mut graph.measurements, parse_measurement(&fields))
            }
            None => false,
        };
        if !accepted {
            graph.skipped_lines += 1;
        }
    }

    if graph.skipped_lines > 0 {
        log::debug!("Graph-Dump: {} Zeilen übersprungen", graph.skipped_lines);
    }
    graph
}

fn push_parsed<T>(list: &mut Vec<T>, entry: Option<T>) -> bool {
    match entry {
        Some(entry) => {
            list.push(entry);
            true
        }
        None => false,
    }
}

fn parse_pose(fields: &[&str]) -> Option<Pose> {
    if fields.len() < 4 {
        return None;
    }
    let position = parse_position(fields[1], fields[2])?;
    let heading: f64 = fields[3].parse().ok()?;
    Some(Pose {
        id: fields[0].parse().ok()?,
        position,
        heading,
    })
}

fn parse_landmark(fields: &[&str]) -> Option<Landmark> {
    if fields.len() < 3 {
        return None;
    }
    Some(Landmark {
        id: fields[0].parse().ok()?,
        position: parse_position(fields[1], fields[2])?,
        kind: fields.get(3).map(|k| k.to_ascii_lowercase()),
    })
}

fn parse_measurement(fields: &[&str]) -> Option<Measurement> {
    if fields.len() < 4 {
        return None;
    }
    Some(Measurement {
        pose_id: fields[0].parse().ok()?,
        landmark_id: fields[1].parse().ok()?,
        range: fields[2].parse().ok()?,
        bearing: fields[3].parse().ok()?,
    })
}

fn parse_position(x: &str, y: &str) -> Option<DVec2> {
    let position = DVec2::new(x.parse().ok()?, y.parse().ok()?);
    position.is_finite().then_some(position)
}

/// Liest einen Graph-Dump aus einer Datei.
pub fn read_graph_file(path: &Path) -> Result<SlamGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Graph-Dump nicht lesbar: {}", path.display()))?;
    let graph = parse_graph(&content);
    log::info!(
        "Graph-Dump {}: {} Posen, {} Landmarken, {} Messungen",
        path.display(),
        graph.poses.len(),
        graph.landmarks.len(),
        graph.measurements.len()
    );
    Ok(graph)
}
