//! Punktlisten: ein `x y`- oder `x,y`-Paar pro Zeile, `#` leitet Kommentare ein.

use anyhow::{bail, Context, Result};
use glam::DVec2;
use std::path::Path;

/// Parst eine Punktliste. Leere Zeilen und Kommentare werden übersprungen.
pub fn parse_point_list(content: &str) -> Result<Vec<DVec2>> {
    let mut points = Vec::new();
    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if values.len() != 2 {
            bail!(
                "Zeile {}: zwei Koordinaten erwartet, {} gefunden",
                line_no + 1,
                values.len()
            );
        }
        let x: f64 = values[0]
            .parse()
            .with_context(|| format!("Zeile {}: ungültige x-Koordinate", line_no + 1))?;
        let y: f64 = values[1]
            .parse()
            .with_context(|| format!("Zeile {}: ungültige y-Koordinate", line_no + 1))?;
        points.push(DVec2::new(x, y));
    }
    Ok(points)
}

/// Formatiert Punkte als Liste (eine Zeile pro Punkt).
pub fn format_point_list(points: &[DVec2]) -> String {
    let mut output = String::new();
    for p in points {
        output.push_str(&format!("{} {}\n", p.x, p.y));
    }
    output
}

/// Liest eine Punktliste aus einer Datei.
pub fn read_point_list(path: &Path) -> Result<Vec<DVec2>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Punktliste nicht lesbar: {}", path.display()))?;
    let points = parse_point_list(&content)
        .with_context(|| format!("Punktliste fehlerhaft: {}", path.display()))?;
    log::info!("{} Punkte gelesen aus: {}", points.len(), path.display());
    Ok(points)
}
