//! Zentrale Konfiguration für das `track-cones`-Werkzeug.
//!
//! `ToolOptions` enthält alle änderbaren Werte; die `const`-Werte bleiben als
//! Fallback/Default erhalten.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use track_boundary_engine::{
    fit_into_area, scale_to_length, scale_uniform, shift_non_negative, AreaFit, EngineParams,
    Marker,
};

use glam::DVec2;
use track_boundary_engine::geometry::polyline_length;

// ── Export ──────────────────────────────────────────────────────────

/// Y-Versatz beim C-Export (Simulator-Koordinaten).
pub const C_EXPORT_Y_OFFSET: f64 = 10.0;
/// Dateiname der Optionen neben der Binary.
pub const CONFIG_FILE_NAME: &str = "track_cones.toml";

// ── Eingabe ─────────────────────────────────────────────────────────

/// Vorbereitung roher Mittellinien vor der Synthese.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    /// Mittellinie zuerst in dieses Rechteck einpassen
    pub fit_area: Option<AreaFit>,
    /// Kürzere Mittellinien werden auf diese Länge hochskaliert
    pub min_track_length: Option<f64>,
}

impl InputOptions {
    /// Wendet Einpassung und Mindestlänge auf die Mittellinie an.
    pub fn prepare(&self, points: &[DVec2]) -> Result<Vec<DVec2>> {
        let mut prepared = points.to_vec();
        if let Some(area) = &self.fit_area {
            prepared = fit_into_area(&prepared, area)?;
        }
        if let Some(min_length) = self.min_track_length {
            let length = polyline_length(&prepared);
            if length < min_length {
                log::info!(
                    "Mittellinie {:.1} kürzer als {:.1}, wird skaliert",
                    length,
                    min_length
                );
                prepared = scale_to_length(&prepared, min_length)?;
            }
        }
        Ok(prepared)
    }
}

// ── Ausgabe ─────────────────────────────────────────────────────────

/// Nachbearbeitung der Markerpositionen vor dem Schreiben.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Marker in dieses Rechteck einpassen
    pub fit_area: Option<AreaFit>,
    /// Gleichmässiger Faktor (z.B. Pixel → Meter)
    pub scale: f64,
    /// Alle Koordinaten in den nicht-negativen Bereich verschieben
    pub shift_non_negative: bool,
    /// Y-Versatz beim C-Export
    pub c_export_y_offset: f64,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            fit_area: None,
            scale: 1.0,
            shift_non_negative: false,
            c_export_y_offset: C_EXPORT_Y_OFFSET,
        }
    }
}

impl OutputOptions {
    /// Transformiert alle Markerpositionen gemeinsam; Seiten bleiben erhalten.
    pub fn apply(&self, markers: &[Marker]) -> Result<Vec<Marker>> {
        if markers.is_empty() {
            return Ok(Vec::new());
        }
        let mut positions: Vec<DVec2> = markers.iter().map(|m| m.position).collect();
        if let Some(area) = &self.fit_area {
            positions = fit_into_area(&positions, area)?;
        }
        if self.scale != 1.0 {
            positions = scale_uniform(&positions, self.scale);
        }
        if self.shift_non_negative {
            positions = shift_non_negative(&positions);
        }
        Ok(markers
            .iter()
            .zip(positions)
            .map(|(m, p)| Marker::new(m.side, p))
            .collect())
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle Optionen des Werkzeugs.
/// Wird als `track_cones.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOptions {
    /// Pipeline-Parameter der Engine
    pub engine: EngineParams,
    pub input: InputOptions,
    pub output: OutputOptions,
}

impl ToolOptions {
    /// Lädt Optionen aus einer TOML-Datei.
    ///
    /// Fehlt die Datei, gelten die Standardwerte. Eine vorhandene, aber
    /// unlesbare oder ungültige Datei ist ein Fehler.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "Keine Optionen unter {}, verwende Standardwerte",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Optionen nicht lesbar: {}", path.display()))
            }
        };
        let options: Self = toml::from_str(&content)
            .with_context(|| format!("Optionen fehlerhaft: {}", path.display()))?;
        options
            .engine
            .validate()
            .with_context(|| format!("Ungültige Engine-Parameter in {}", path.display()))?;
        log::info!("Optionen geladen aus: {}", path.display());
        Ok(options)
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Optionen nicht serialisierbar")?;
        std::fs::write(path, content)
            .with_context(|| format!("Optionen nicht schreibbar: {}", path.display()))?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Pfad der Optionen-Datei: neben der Binary, sonst im Arbeitsverzeichnis.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}
