//! Gieriges Ausdünnen von Markern nach Mindestabstand.
//!
//! Reihenfolgeabhängig: der zuerst erzeugte Marker gewinnt. Die
//! Nachbarschaftssuche läuft über ein Raster mit Zellgrösse `min_spacing`,
//! sodass nur die 3×3 Nachbarzellen geprüft werden müssen.

use glam::DVec2;
use std::collections::HashMap;

/// Dünnt Punkte aus: ein Punkt bleibt nur, wenn er zu allen bereits
/// behaltenen Punkten mindestens `min_spacing` Abstand hat.
pub fn dedupe(points: &[DVec2], min_spacing: f64) -> Vec<DVec2> {
    dedupe_by(points, min_spacing, |p| *p)
}

/// Wie [`dedupe`], für beliebige Elemente mit Position.
pub fn dedupe_by<T, F>(items: &[T], min_spacing: f64, position: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> DVec2,
{
    if !(min_spacing > 0.0 && min_spacing.is_finite()) {
        return items.to_vec();
    }
    let inv = 1.0 / min_spacing;
    // `as` sättigt; Nachbarzellen am Rand ebenso
    let cell_of = |p: DVec2| ((p.x * inv).floor() as i64, (p.y * inv).floor() as i64);

    let mut grid: HashMap<(i64, i64), Vec<DVec2>> = HashMap::new();
    let mut kept = Vec::with_capacity(items.len());

    for item in items {
        let p = position(item);
        let (cx, cy) = cell_of(p);
        let blocked = (-1..=1).any(|dx| {
            (-1..=1).any(|dy| {
                grid.get(&(cx.saturating_add(dx), cy.saturating_add(dy)))
                    .is_some_and(|cell| cell.iter().any(|q| q.distance(p) < min_spacing))
            })
        });
        if blocked {
            continue;
        }
        grid.entry((cx, cy)).or_default().push(p);
        kept.push(item.clone());
    }

    if kept.len() < items.len() {
        log::debug!(
            "Ausdünnung: {} von {} Markern verworfen (Mindestabstand {:.3})",
            items.len() - kept.len(),
            items.len(),
            min_spacing
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(points: &[DVec2], min_spacing: f64) -> Vec<DVec2> {
        let mut kept: Vec<DVec2> = Vec::new();
        for &p in points {
            if kept.iter().all(|q| q.distance(p) >= min_spacing) {
                kept.push(p);
            }
        }
        kept
    }

    fn scattered() -> Vec<DVec2> {
        (0..200)
            .map(|i| {
                let t = i as f64 * 0.37;
                DVec2::new((t * 1.7).sin() * 10.0 + t * 0.3, (t * 2.3).cos() * 8.0)
            })
            .collect()
    }

    #[test]
    fn first_seen_wins() {
        let pts = [DVec2::ZERO, DVec2::new(0.5, 0.0), DVec2::new(1.2, 0.0)];
        assert_eq!(dedupe(&pts, 1.0), vec![DVec2::ZERO, DVec2::new(1.2, 0.0)]);
    }

    #[test]
    fn grid_matches_pairwise_check() {
        let pts = scattered();
        for d in [0.1, 0.5, 1.0, 2.5, 7.0] {
            assert_eq!(dedupe(&pts, d), brute_force(&pts, d), "d = {d}");
        }
    }

    #[test]
    fn dedupe_is_idempotent() {
        let pts = scattered();
        for d in [0.0, 0.3, 1.0, 4.0] {
            let once = dedupe(&pts, d);
            assert_eq!(dedupe(&once, d), once);
        }
    }

    #[test]
    fn non_positive_spacing_keeps_everything() {
        let pts = [DVec2::ZERO, DVec2::ZERO];
        assert_eq!(dedupe(&pts, 0.0).len(), 2);
        assert_eq!(dedupe(&pts, -1.0).len(), 2);
    }

    #[test]
    fn dedupe_by_keeps_payload() {
        let items = [("a", DVec2::ZERO), ("b", DVec2::new(0.1, 0.0)), ("c", DVec2::X * 3.0)];
        let kept = dedupe_by(&items, 1.0, |(_, p)| *p);
        let names: Vec<&str> = kept.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn far_away_coordinates_do_not_overflow_grid() {
        let points = [
            DVec2::new(1e19, 0.0),
            DVec2::new(1e19 + 1e5, 0.0),
            DVec2::new(-1e19, -1e19),
            DVec2::new(-1e19, -1e19),
        ];
        let kept = dedupe(&points, 1.0);
        assert_eq!(kept, brute_force(&points, 1.0));
        assert_eq!(kept.len(), 3);
    }
}
