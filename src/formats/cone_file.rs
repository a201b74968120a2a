//! Kegel-Datei: `{ cones: [ { color, x, y } ] }` als YAML oder JSON.

use anyhow::{bail, Context, Result};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use track_boundary_engine::{Marker, Side};

/// Ein Kegel-Eintrag wie er in der Datei steht.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeRecord {
    pub color: String,
    pub x: f64,
    pub y: f64,
}

impl ConeRecord {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Seite aus der Farbe; `None` für andere Kegelfarben.
    pub fn side(&self) -> Option<Side> {
        Side::from_color(&self.color)
    }
}

impl From<&Marker> for ConeRecord {
    fn from(marker: &Marker) -> Self {
        Self {
            color: marker.side.color().to_string(),
            x: marker.position.x,
            y: marker.position.y,
        }
    }
}

/// Inhalt einer Kegel-Datei.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConeFile {
    #[serde(default)]
    pub cones: Vec<ConeRecord>,
}

impl ConeFile {
    pub fn from_markers(markers: &[Marker]) -> Self {
        Self {
            cones: markers.iter().map(ConeRecord::from).collect(),
        }
    }

    /// Marker aller blauen/gelben Kegel; andere Farben werden übersprungen.
    pub fn markers(&self) -> Vec<Marker> {
        let mut skipped = 0usize;
        let markers: Vec<Marker> = self
            .cones
            .iter()
            .filter_map(|cone| match cone.side() {
                Some(side) => Some(Marker::new(side, cone.position())),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect();
        if skipped > 0 {
            log::warn!("{} Kegel mit unbekannter Farbe übersprungen", skipped);
        }
        markers
    }
}

/// Dateiformat, gewählt über die Dateiendung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConeFormat {
    Yaml,
    Json,
}

impl ConeFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "Unbekanntes Kegel-Dateiformat: {} (erwartet .yaml, .yml oder .json)",
                path.display()
            ),
        }
    }
}

/// Serialisiert die Kegel im gewählten Format.
pub fn cones_to_string(file: &ConeFile, format: ConeFormat) -> Result<String> {
    Ok(match format {
        ConeFormat::Yaml => serde_yaml::to_string(file)?,
        ConeFormat::Json => serde_json::to_string_pretty(file)?,
    })
}

/// Liest Kegel aus einem String im gewählten Format.
pub fn cones_from_str(content: &str, format: ConeFormat) -> Result<ConeFile> {
    Ok(match format {
        ConeFormat::Yaml => serde_yaml::from_str(content)?,
        ConeFormat::Json => serde_json::from_str(content)?,
    })
}

/// Schreibt eine Kegel-Datei; Format nach Endung.
pub fn write_cone_file(path: &Path, file: &ConeFile) -> Result<()> {
    let format = ConeFormat::from_path(path)?;
    let content = cones_to_string(file, format)?;
    std::fs::write(path, content)
        .with_context(|| format!("Kegel-Datei nicht schreibbar: {}", path.display()))?;
    log::info!("{} Kegel geschrieben nach: {}", file.cones.len(), path.display());
    Ok(())
}

/// Liest eine Kegel-Datei; Format nach Endung.
pub fn read_cone_file(path: &Path) -> Result<ConeFile> {
    let format = ConeFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Kegel-Datei nicht lesbar: {}", path.display()))?;
    cones_from_str(&content, format)
        .with_context(|| format!("Kegel-Datei fehlerhaft: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConeFile {
        ConeFile::from_markers(&[
            Marker::new(Side::Outer, DVec2::new(18.4878, 0.0375)),
            Marker::new(Side::Inner, DVec2::new(19.117, 3.0)),
        ])
    }

    #[test]
    fn yaml_uses_color_names() {
        let text = cones_to_string(&sample(), ConeFormat::Yaml).unwrap();
        assert!(text.starts_with("cones:"));
        assert!(text.contains("color: yellow"));
        assert!(text.contains("color: blue"));
        assert_eq!(cones_from_str(&text, ConeFormat::Yaml).unwrap(), sample());
    }

    #[test]
    fn handwritten_yaml_is_accepted() {
        let text = "cones:\n  - color: yellow\n    x: 1\n    y: 2.5\n  - color: orange\n    x: 0\n    y: 0\n";
        let file = cones_from_str(text, ConeFormat::Yaml).unwrap();
        assert_eq!(file.cones.len(), 2);
        let markers = file.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].side, Side::Outer);
        assert_eq!(markers[0].position, DVec2::new(1.0, 2.5));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConeFormat::from_path(Path::new("a/track.YML")).unwrap(), ConeFormat::Yaml);
        assert_eq!(ConeFormat::from_path(Path::new("track.json")).unwrap(), ConeFormat::Json);
        assert!(ConeFormat::from_path(Path::new("track.txt")).is_err());
    }
}
