//! Bottleneck Distance Between Persistence Diagrams
//!
//! d_B(X, Y) = inf_γ sup_x ‖x − γ(x)‖_∞ over bijections γ between X and Y
//! where any point may instead be matched to its diagonal projection at
//! cost (death − birth)/2.
//!
//! ## Algorithm
//!
//! The optimum is one of the candidate costs (pairwise L∞ distances and
//! half-persistences). Binary search over the sorted candidates, testing
//! each with a perfect-matching check on the augmented bipartite graph
//!
//!   left  = X ∪ diag(Y),   right = Y ∪ diag(X)
//!
//! where diagonal copies match each other for free. Matchings use
//! Hopcroft–Karp.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::topology::PersistencePair;

const NIL: usize = usize::MAX;

/// Bottleneck distance between two diagrams of finite pairs
pub fn bottleneck_distance(a: &[PersistencePair], b: &[PersistencePair]) -> Result<f64> {
    if a.iter().chain(b).any(|p| !(p.birth.is_finite() && p.death.is_finite())) {
        return Err(Error::non_finite("bottleneck input (strip essential pairs first)"));
    }
    if a.is_empty() && b.is_empty() {
        return Ok(0.0);
    }

    let half = |p: &PersistencePair| (p.death - p.birth).abs() / 2.0;

    let mut candidates: Vec<f64> = a.iter().chain(b).map(half).collect();
    for p in a {
        for q in b {
            candidates.push(linf(p, q));
        }
    }
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();

    let (mut lo, mut hi) = (0, candidates.len() - 1);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if has_perfect_matching(a, b, candidates[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(candidates[lo])
}

fn linf(p: &PersistencePair, q: &PersistencePair) -> f64 {
    (p.birth - q.birth).abs().max((p.death - q.death).abs())
}

/// Whether every point can be matched within distance `r`
fn has_perfect_matching(a: &[PersistencePair], b: &[PersistencePair], r: f64) -> bool {
    let (n, m) = (a.len(), b.len());
    let size = n + m;

    // Left 0..n are points of a, n..n+m diagonal copies of b.
    // Right 0..m are points of b, m..m+n diagonal copies of a.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); size];
    for (i, p) in a.iter().enumerate() {
        for (j, q) in b.iter().enumerate() {
            if linf(p, q) <= r {
                adjacency[i].push(j);
            }
        }
        if (p.death - p.birth).abs() / 2.0 <= r {
            adjacency[i].push(m + i);
        }
    }
    for (j, q) in b.iter().enumerate() {
        if (q.death - q.birth).abs() / 2.0 <= r {
            adjacency[n + j].push(j);
        }
        adjacency[n + j].extend(m..m + n);
    }

    hopcroft_karp(&adjacency, size) == size
}

/// Maximum matching size of a bipartite graph given left adjacency lists
fn hopcroft_karp(adjacency: &[Vec<usize>], n_right: usize) -> usize {
    let n_left = adjacency.len();
    let mut match_left = vec![NIL; n_left];
    let mut match_right = vec![NIL; n_right];
    let mut dist = vec![0usize; n_left];
    let mut matching = 0;

    while bfs(adjacency, &match_left, &match_right, &mut dist) {
        for u in 0..n_left {
            if match_left[u] == NIL && dfs(u, adjacency, &mut match_left, &mut match_right, &mut dist) {
                matching += 1;
            }
        }
    }
    matching
}

fn bfs(adjacency: &[Vec<usize>], match_left: &[usize], match_right: &[usize], dist: &mut [usize]) -> bool {
    let mut queue = VecDeque::new();
    for (u, &m) in match_left.iter().enumerate() {
        if m == NIL {
            dist[u] = 0;
            queue.push_back(u);
        } else {
            dist[u] = NIL;
        }
    }

    let mut found_free = false;
    while let Some(u) = queue.pop_front() {
        for &v in &adjacency[u] {
            let w = match_right[v];
            if w == NIL {
                found_free = true;
            } else if dist[w] == NIL {
                dist[w] = dist[u] + 1;
                queue.push_back(w);
            }
        }
    }
    found_free
}

fn dfs(
    u: usize,
    adjacency: &[Vec<usize>],
    match_left: &mut [usize],
    match_right: &mut [usize],
    dist: &mut [usize],
) -> bool {
    for &v in &adjacency[u] {
        let w = match_right[v];
        let advance = w == NIL || (dist[w] == dist[u] + 1 && dfs(w, adjacency, match_left, match_right, dist));
        if advance {
            match_left[u] = v;
            match_right[v] = u;
            return true;
        }
    }
    dist[u] = NIL;
    false
}
