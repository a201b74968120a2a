//! Douglas-Peucker-Vereinfachung.

use glam::DVec2;

/// Abstand von `p` zur Strecke `a`–`b`.
pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Vereinfacht einen Punktlauf mit Toleranz `tolerance`.
///
/// Geschlossene Läufe werden ohne Schlusspunkt übergeben und ohne Schlusspunkt
/// zurückgegeben. Sie werden am vom Start am weitesten entfernten Punkt geteilt
/// und beide Hälften getrennt vereinfacht.
pub fn simplify(points: &[DVec2], tolerance: f64, closed: bool) -> Vec<DVec2> {
    if tolerance <= 0.0 || points.len() < 3 {
        return points.to_vec();
    }
    if !closed {
        return douglas_peucker(points, tolerance);
    }

    let start = points[0];
    let split = points
        .iter()
        .enumerate()
        .max_by(|a, b| start.distance(*a.1).total_cmp(&start.distance(*b.1)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if split == 0 {
        return points.to_vec();
    }

    let first = douglas_peucker(&points[..=split], tolerance);
    let mut second_half: Vec<DVec2> = points[split..].to_vec();
    second_half.push(start);
    let second = douglas_peucker(&second_half, tolerance);

    let mut result = first;
    result.extend_from_slice(&second[1..second.len() - 1]);
    result
}

/// Offener Douglas-Peucker; Start und Ende bleiben immer erhalten.
fn douglas_peucker(points: &[DVec2], tolerance: f64) -> Vec<DVec2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let (a, b) = (points[lo], points[hi]);
        let mut worst = (lo, 0.0);
        for (i, &p) in points.iter().enumerate().take(hi).skip(lo + 1) {
            let d = point_segment_distance(p, a, b);
            if d > worst.1 {
                worst = (i, d);
            }
        }
        if worst.1 > tolerance {
            keep[worst.0] = true;
            stack.push((lo, worst.0));
            stack.push((worst.0, hi));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}
