//! Markierte Randpunkte (Kegel).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Streckenseite eines Markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Inner,
    Outer,
}

impl Side {
    /// Farbname im Kegel-Dateiformat (innen blau, aussen gelb).
    pub fn color(self) -> &'static str {
        match self {
            Self::Inner => "blue",
            Self::Outer => "yellow",
        }
    }

    /// Umkehrung von [`Side::color`], Gross-/Kleinschreibung egal.
    pub fn from_color(color: &str) -> Option<Self> {
        match color.trim().to_ascii_lowercase().as_str() {
            "blue" => Some(Self::Inner),
            "yellow" => Some(Self::Outer),
            _ => None,
        }
    }
}

/// Ein Marker wird nach der Erzeugung nie verändert, nur gefiltert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub side: Side,
    pub position: DVec2,
}

impl Marker {
    pub fn new(side: Side, position: DVec2) -> Self {
        Self { side, position }
    }
}

/// Verzahnt beide Ringe: je Index erst aussen, dann innen; Überhang wird angehängt.
pub fn interleave(outer: &[DVec2], inner: &[DVec2]) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(outer.len() + inner.len());
    for i in 0..outer.len().max(inner.len()) {
        if let Some(&p) = outer.get(i) {
            markers.push(Marker::new(Side::Outer, p));
        }
        if let Some(&p) = inner.get(i) {
            markers.push(Marker::new(Side::Inner, p));
        }
    }
    markers
}

/// Positionen aller Marker einer Seite in Erzeugungsreihenfolge.
pub fn positions(markers: &[Marker], side: Side) -> Vec<DVec2> {
    markers
        .iter()
        .filter(|m| m.side == side)
        .map(|m| m.position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_appends_leftovers() {
        let outer = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        let inner = [DVec2::new(0.0, 1.0)];
        let markers = interleave(&outer, &inner);
        let sides: Vec<Side> = markers.iter().map(|m| m.side).collect();
        assert_eq!(
            sides,
            vec![Side::Outer, Side::Inner, Side::Outer, Side::Outer]
        );
        assert_eq!(positions(&markers, Side::Outer).len(), 3);
    }

    #[test]
    fn colors_round_trip() {
        for side in [Side::Inner, Side::Outer] {
            assert_eq!(Side::from_color(side.color()), Some(side));
        }
        assert_eq!(Side::from_color(" Yellow "), Some(Side::Outer));
        assert_eq!(Side::from_color("orange"), None);
    }
}
