//! Trennung unsortierter Kegelpositionen in inneren und äusseren Rand.

use crate::error::{Result, TrackError};
use crate::marker::Side;
use crate::spatial::SpatialIndex;
use glam::DVec2;

/// Obergrenze der Lloyd-Iterationen.
const MAX_ITERATIONS: usize = 100;

/// Ergebnis von [`separate`]; Reihenfolge innerhalb der Gruppen wie in der Eingabe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Separation {
    pub inner: Vec<DVec2>,
    pub outer: Vec<DVec2>,
}

/// Teilt `points` per k-Means (k = 2) in zwei Gruppen.
///
/// Innen ist die Gruppe, deren Schwerpunkt im Mittel näher an der
/// Fahrspur (`pose_trail`) liegt. Weniger als zwei Punkte ergeben zwei
/// leere Gruppen.
pub fn separate(points: &[DVec2], pose_trail: &[DVec2]) -> Result<Separation> {
    let sides = classify_sides(points, pose_trail)?;
    let mut separation = Separation::default();
    for (&p, side) in points.iter().zip(sides) {
        match side {
            Side::Inner => separation.inner.push(p),
            Side::Outer => separation.outer.push(p),
        }
    }
    log::debug!(
        "Trennung: {} innen, {} aussen",
        separation.inner.len(),
        separation.outer.len()
    );
    Ok(separation)
}

/// Seite je Eingabepunkt (gleiche Reihenfolge); leer bei weniger als zwei Punkten.
pub fn classify_sides(points: &[DVec2], pose_trail: &[DVec2]) -> Result<Vec<Side>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }
    if pose_trail.is_empty() {
        return Err(TrackError::InsufficientData {
            needed: 1,
            found: 0,
        });
    }

    let (labels, centroids) = two_means(points);
    let mean_distance = |c: DVec2| {
        pose_trail.iter().map(|p| p.distance(c)).sum::<f64>() / pose_trail.len() as f64
    };
    let inner_label = usize::from(mean_distance(centroids[1]) < mean_distance(centroids[0]));

    Ok(labels
        .into_iter()
        .map(|label| {
            if label == inner_label {
                Side::Inner
            } else {
                Side::Outer
            }
        })
        .collect())
}

/// Deterministisches k-Means mit k = 2 und Farthest-Point-Initialisierung.
fn two_means(points: &[DVec2]) -> (Vec<usize>, [DVec2; 2]) {
    let first = points[0];
    let second = points
        .iter()
        .copied()
        .fold(first, |best, p| {
            if p.distance_squared(first) > best.distance_squared(first) {
                p
            } else {
                best
            }
        });
    let mut centroids = [first, second];
    let mut labels = vec![usize::MAX; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (label, p) in labels.iter_mut().zip(points) {
            // Gleichstand geht an Cluster 0
            let next =
                usize::from(p.distance_squared(centroids[1]) < p.distance_squared(centroids[0]));
            if *label != next {
                *label = next;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        for (k, centroid) in centroids.iter_mut().enumerate() {
            let (sum, count) = points
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l == k)
                .fold((DVec2::ZERO, 0usize), |(s, c), (p, _)| (s + *p, c + 1));
            if count > 0 {
                *centroid = sum / count as f64;
            }
        }
    }
    (labels, centroids)
}

/// Ordnet eine unsortierte Punktwolke per Nächster-Nachbar-Verkettung zu einem Umlauf.
///
/// Start ist der Punkt mit kleinstem x (bei Gleichstand kleinstem y).
pub fn order_loop(points: &[DVec2]) -> Vec<DVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let index = SpatialIndex::from_points(points);
    let Some(start) = (0..points.len()).min_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
    }) else {
        return Vec::new();
    };

    let mut visited = vec![false; points.len()];
    let mut order = Vec::with_capacity(points.len());
    let mut current = start;
    visited[current] = true;
    order.push(points[current]);

    let reach = crate::geometry::placement::bounds(points)
        .map(|(lo, hi)| lo.distance(hi))
        .unwrap_or(0.0);
    let initial_radius = (reach / (points.len() as f64).sqrt()).max(f64::EPSILON);

    while order.len() < points.len() {
        let query = points[current];
        let mut radius = initial_radius;
        let next = loop {
            let hit = index
                .within_radius(query, radius)
                .into_iter()
                .find(|m| !visited[m.index]);
            if let Some(hit) = hit {
                break Some(hit.index);
            }
            if radius > reach {
                break None;
            }
            radius *= 2.0;
        };
        let Some(next) = next else {
            break;
        };
        visited[next] = true;
        order.push(points[next]);
        current = next;
    }
    order
}
