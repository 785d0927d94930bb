//! Agglomerative clustering with average linkage.
//!
//! Starts from singletons and repeatedly merges the closest pair of
//! clusters, where the distance between two clusters is the mean distance
//! over all cross pairs of their members. Merging stops once the closest
//! pair is at or beyond the threshold, so the number of clusters falls out
//! of the data rather than being fixed up front.

use crate::similarity::pairwise_distances;

/// Cluster `points` and return groups of point indices.
///
/// Each group lists member indices in ascending order and groups are ordered
/// by their first member, which makes the output independent of merge order.
/// Ties between equally close pairs are broken by the lowest index pair.
pub fn agglomerative_average(points: &[Vec<f32>], distance_threshold: f64) -> Vec<Vec<usize>> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    // Entry (i, j) holds the average-linkage distance between the clusters
    // whose representatives are i and j. Only rows of live clusters are read.
    let mut dist = pairwise_distances(points);
    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();

    while let Some((a, b, d)) = closest_pair(&dist, &members) {
        if d >= distance_threshold {
            break;
        }

        let absorbed = members[b].take().unwrap_or_default();
        let size_a = members[a].as_ref().map_or(0, Vec::len) as f64;
        let size_b = absorbed.len() as f64;

        // Lance-Williams update for average linkage
        for k in 0..n {
            if k == a || members[k].is_none() {
                continue;
            }
            let merged = (size_a * dist[a][k] + size_b * dist[b][k]) / (size_a + size_b);
            dist[a][k] = merged;
            dist[k][a] = merged;
        }

        if let Some(group) = members[a].as_mut() {
            group.extend(absorbed);
        }
    }

    let mut groups: Vec<Vec<usize>> = members
        .into_iter()
        .flatten()
        .map(|mut group| {
            group.sort_unstable();
            group
        })
        .collect();
    groups.sort_by_key(|group| group[0]);
    groups
}

/// Closest pair of live clusters as `(a, b, distance)` with `a < b`.
fn closest_pair(dist: &[Vec<f64>], members: &[Option<Vec<usize>>]) -> Option<(usize, usize, f64)> {
    let live: Vec<usize> = (0..members.len())
        .filter(|&i| members[i].is_some())
        .collect();

    let mut best: Option<(usize, usize, f64)> = None;
    for (pos, &i) in live.iter().enumerate() {
        for &j in &live[pos + 1..] {
            let d = dist[i][j];
            if best.map_or(true, |(_, _, best_d)| d < best_d) {
                best = Some((i, j, d));
            }
        }
    }
    best
}
