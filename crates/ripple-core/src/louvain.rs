// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Seeded multi-level Louvain modularity optimisation, the default
//! [`CommunityDetector`].
//!
//! Each level greedily moves nodes (visited in a seed-shuffled order) into the
//! neighbouring community with the best modularity gain, then collapses
//! communities into super-nodes and repeats while modularity still improves.

use std::collections::{BTreeMap, BTreeSet};

use ripple_graph::{NodeId, UndirectedGraph};

use crate::community::CommunityDetector;
use crate::error::DetectorError;
use crate::prng::Prng;

/// Louvain tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LouvainDetector {
    /// Modularity resolution; above 1 favours smaller communities.
    pub resolution: f64,
    /// Minimum modularity gain for another aggregation level.
    pub threshold: f64,
    /// Hard cap on aggregation levels.
    pub max_levels: usize,
}

impl Default for LouvainDetector {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            threshold: 1e-7,
            max_levels: 32,
        }
    }
}

/// Weighted graph over dense indices; self-loop weight kept apart.
struct LevelGraph {
    adj: Vec<Vec<(usize, f64)>>,
    self_w: Vec<f64>,
    degree: Vec<f64>,
    total: f64,
}

impl LevelGraph {
    fn new(adj: Vec<Vec<(usize, f64)>>, self_w: Vec<f64>) -> Self {
        let degree: Vec<f64> = adj
            .iter()
            .zip(&self_w)
            .map(|(row, s)| row.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * s)
            .collect();
        let total = degree.iter().sum::<f64>() / 2.0;
        Self {
            adj,
            self_w,
            degree,
            total,
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn modularity(&self, community: &[usize], resolution: f64) -> f64 {
        if self.total == 0.0 {
            return 0.0;
        }
        let k = community.iter().max().map_or(0, |c| c + 1);
        let mut internal = vec![0.0; k];
        let mut tot = vec![0.0; k];
        for i in 0..self.len() {
            let ci = community[i];
            tot[ci] += self.degree[i];
            internal[ci] += self.self_w[i];
            for &(j, w) in &self.adj[i] {
                if community[j] == ci {
                    // each internal tie is visited from both ends
                    internal[ci] += w / 2.0;
                }
            }
        }
        let m = self.total;
        internal
            .iter()
            .zip(&tot)
            .map(|(l, d)| l / m - resolution * (d / (2.0 * m)).powi(2))
            .sum()
    }

    /// Local moving phase. Returns dense community labels and whether any node moved.
    fn one_level(&self, resolution: f64, prng: &mut Prng) -> (Vec<usize>, bool) {
        let n = self.len();
        let mut community: Vec<usize> = (0..n).collect();
        if self.total == 0.0 {
            return (community, false);
        }
        let mut sigma_tot = self.degree.clone();
        let mut order: Vec<usize> = (0..n).collect();
        prng.shuffle(&mut order);

        let two_m = 2.0 * self.total;
        let mut any_move = false;
        loop {
            let mut moved = false;
            for &i in &order {
                let ci = community[i];
                let ki = self.degree[i];
                sigma_tot[ci] -= ki;

                // Weight from i into each neighbouring community, first-seen order.
                let mut links: Vec<(usize, f64)> = Vec::new();
                for &(j, w) in &self.adj[i] {
                    let cj = community[j];
                    match links.iter_mut().find(|(c, _)| *c == cj) {
                        Some((_, acc)) => *acc += w,
                        None => links.push((cj, w)),
                    }
                }

                let w_home = links
                    .iter()
                    .find(|(c, _)| *c == ci)
                    .map_or(0.0, |(_, w)| *w);
                let mut best = ci;
                let mut best_gain = w_home - resolution * sigma_tot[ci] * ki / two_m;
                for &(c, w) in &links {
                    let gain = w - resolution * sigma_tot[c] * ki / two_m;
                    if gain > best_gain {
                        best_gain = gain;
                        best = c;
                    }
                }

                sigma_tot[best] += ki;
                if best != ci {
                    community[i] = best;
                    moved = true;
                    any_move = true;
                }
            }
            if !moved {
                break;
            }
        }
        (relabel(&community), any_move)
    }

    /// Collapse each community into one node.
    fn aggregate(&self, community: &[usize]) -> Self {
        let k = community.iter().max().map_or(0, |c| c + 1);
        let mut rows: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); k];
        let mut self_w = vec![0.0; k];
        for i in 0..self.len() {
            let ci = community[i];
            self_w[ci] += self.self_w[i];
            for &(j, w) in &self.adj[i] {
                let cj = community[j];
                if ci == cj {
                    self_w[ci] += w / 2.0;
                } else {
                    *rows[ci].entry(cj).or_default() += w;
                }
            }
        }
        let adj = rows.into_iter().map(|r| r.into_iter().collect()).collect();
        Self::new(adj, self_w)
    }
}

/// Renumber labels densely in order of first appearance.
fn relabel(community: &[usize]) -> Vec<usize> {
    let mut map: BTreeMap<usize, usize> = BTreeMap::new();
    community
        .iter()
        .map(|c| {
            let next = map.len();
            *map.entry(*c).or_insert(next)
        })
        .collect()
}

impl CommunityDetector for LouvainDetector {
    fn partition(
        &self,
        graph: &UndirectedGraph,
        seed: u64,
    ) -> Result<Vec<BTreeSet<NodeId>>, DetectorError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(DetectorError::Failed(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        let ids: Vec<&NodeId> = graph.nodes().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let index: BTreeMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let mut adj = vec![Vec::new(); ids.len()];
        let mut self_w = vec![0.0; ids.len()];
        for (i, n) in ids.iter().enumerate() {
            adj[i] = graph
                .neighbors(n)
                .filter_map(|m| index.get(m).map(|&j| (j, 1.0)))
                .collect();
            if graph.has_self_loop(n) {
                self_w[i] = 1.0;
            }
        }

        let mut level = LevelGraph::new(adj, self_w);
        // members[s] = original indices folded into super-node s
        let mut members: Vec<Vec<usize>> = (0..ids.len()).map(|i| vec![i]).collect();
        let mut prng = Prng::from_seed(seed);
        let mut modularity = level.modularity(&(0..level.len()).collect::<Vec<_>>(), self.resolution);

        for _ in 0..self.max_levels {
            let (community, moved) = level.one_level(self.resolution, &mut prng);
            if !moved {
                break;
            }
            let next_q = level.modularity(&community, self.resolution);
            let k = community.iter().max().map_or(0, |c| c + 1);
            let mut folded: Vec<Vec<usize>> = vec![Vec::new(); k];
            for (s, c) in community.iter().enumerate() {
                folded[*c].append(&mut members[s]);
            }
            members = folded;
            level = level.aggregate(&community);
            if next_q - modularity <= self.threshold {
                break;
            }
            modularity = next_q;
        }

        let mut groups: Vec<BTreeSet<NodeId>> = members
            .into_iter()
            .filter(|m| !m.is_empty())
            .map(|m| m.into_iter().map(|i| ids[i].clone()).collect())
            .collect();
        // Largest first, ties by smallest member, so ids do not depend on label order.
        groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));
        Ok(groups)
    }
}
