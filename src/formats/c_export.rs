//! Export als C-Initialisierer für den 2D-Simulator.
//!
//! Pro Kegel drei Zuweisungen, danach eine Leerzeile:
//!
//! ```text
//! points[0].x = 18.4878;
//! points[0].y = 10.0375;
//! points[0].color = giallo;
//! ```

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use super::cone_file::ConeRecord;

/// Bezeichner der Farbe im Simulator-Quelltext.
pub fn c_color_name(color: &str) -> &str {
    match color.trim().to_ascii_lowercase().as_str() {
        "yellow" => "giallo",
        "blue" => "blu",
        _ => color.trim(),
    }
}

/// Formatiert alle Kegel; `y_offset` wird auf jede y-Koordinate addiert.
pub fn format_c_initializer(cones: &[ConeRecord], y_offset: f64) -> String {
    let mut output = String::new();
    for (i, cone) in cones.iter().enumerate() {
        let _ = writeln!(output, "points[{}].x = {:?};", i, cone.x);
        let _ = writeln!(output, "points[{}].y = {:?};", i, cone.y + y_offset);
        let _ = writeln!(output, "points[{}].color = {};", i, c_color_name(&cone.color));
        output.push('\n');
    }
    output
}

/// Schreibt den C-Initialisierer in eine Datei.
pub fn write_c_initializer(path: &Path, cones: &[ConeRecord], y_offset: f64) -> Result<()> {
    std::fs::write(path, format_c_initializer(cones, y_offset))
        .with_context(|| format!("C-Export nicht schreibbar: {}", path.display()))?;
    log::info!("{} Kegel als C-Initialisierer exportiert: {}", cones.len(), path.display());
    Ok(())
}
