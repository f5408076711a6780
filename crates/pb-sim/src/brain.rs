use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::trace;

use crate::area::Area;
use crate::{AreaName, ProjectionMap};

/// Candidate cell considered during winner selection.
/// Fresh candidates carry their rank ordinal, not a cell index; a real
/// index is assigned only if they win.
#[derive(Clone, Copy)]
enum Candidate {
    Existing(usize),
    Fresh(usize),
}

/// The simulation engine: a set of named areas plus the synapses between
/// them, sampled lazily at connection probability `p`.
///
/// Synapses exist per ordered area pair, so the weight of (A→B, i→j) is
/// independent of (B→A, j→i). Gating is not the engine's concern: callers
/// decide which flows are legal each round and pass them to [`project`].
///
/// [`project`]: Brain::project
pub struct Brain {
    p: f64,
    areas: BTreeMap<AreaName, Area>,
    /// (from, to) → sampled synapse weights keyed by (source cell, target cell).
    /// Zero entries record "sampled, not connected" so a pair is never drawn twice.
    weights: HashMap<(AreaName, AreaName), HashMap<(usize, usize), f64>>,
    /// Per-pair Hebbian scaling overrides; falls back to the target area's beta.
    betas: HashMap<(AreaName, AreaName), f64>,
    pub disable_plasticity: bool,
    rng: SmallRng,
}

impl Brain {
    pub fn new(p: f64, seed: u64) -> Self {
        Self {
            p,
            areas: BTreeMap::new(),
            weights: HashMap::new(),
            betas: HashMap::new(),
            disable_plasticity: false,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn add_area(&mut self, name: AreaName, n: usize, k: usize, beta: f64) {
        self.areas.insert(name, Area::new(name, n, k, beta));
    }

    pub fn add_explicit_area(&mut self, name: AreaName, n: usize, k: usize, beta: f64) {
        self.areas.insert(name, Area::new_explicit(name, n, k, beta));
    }

    /// Override the Hebbian scaling of the `from` → `to` connectome.
    pub fn set_plasticity(&mut self, from: AreaName, to: AreaName, beta: f64) {
        self.betas.insert((from, to), beta);
    }

    pub fn area(&self, name: AreaName) -> &Area {
        &self.areas[name]
    }

    pub fn winners(&self, name: AreaName) -> &[usize] {
        &self.areas[name].winners
    }

    fn area_mut(&mut self, name: AreaName) -> &mut Area {
        match self.areas.get_mut(name) {
            Some(area) => area,
            None => panic!("unknown area: {name}"),
        }
    }

    /// Set an explicit area's winners to the given slot's cell range and
    /// freeze the assembly in place.
    pub fn activate_assembly(&mut self, name: AreaName, slot: usize) {
        let area = self.area_mut(name);
        let start = slot * area.k;
        debug_assert!(start + area.k <= area.n, "slot {slot} beyond {name} capacity");
        area.winners = (start..start + area.k).collect();
        area.fixed = true;
    }

    /// Replace an area's winner set directly, without freezing.
    pub fn set_winners(&mut self, name: AreaName, winners: Vec<usize>) {
        self.area_mut(name).winners = winners;
    }

    pub fn fix_assembly(&mut self, name: AreaName) {
        self.area_mut(name).fixed = true;
    }

    pub fn unfix_assembly(&mut self, name: AreaName) {
        self.area_mut(name).fixed = false;
    }

    /// Empty an area's winner set and retire its recruited cells: the next
    /// projection into the area recruits a fresh assembly rather than
    /// re-electing the retired one.
    pub fn clear_assembly(&mut self, name: AreaName) {
        let area = self.area_mut(name);
        area.winners.clear();
        area.floor = area.support;
    }

    /// Advance one round: every target in the map recomputes its winners
    /// from the current winners of the areas flowing into it, all winner
    /// sets commit simultaneously, then co-firing synapses strengthen.
    ///
    /// Frozen targets keep their winner set but still receive plasticity,
    /// which is what lets committed assemblies bind to incoming words.
    pub fn project(&mut self, map: &ProjectionMap) {
        let mut inbound: BTreeMap<AreaName, Vec<AreaName>> = BTreeMap::new();
        for (&from, targets) in map {
            for &to in targets {
                inbound.entry(to).or_default().push(from);
            }
        }

        let prior: BTreeMap<AreaName, Vec<usize>> = self
            .areas
            .iter()
            .map(|(name, area)| (*name, area.winners.clone()))
            .collect();

        let mut staged: Vec<(AreaName, Vec<AreaName>, Vec<usize>)> = Vec::new();
        for (&target, sources) in &inbound {
            let active: Vec<(AreaName, Vec<usize>)> = sources
                .iter()
                .filter(|s| !prior[**s].is_empty())
                .map(|&s| (s, prior[s].clone()))
                .collect();
            if active.is_empty() {
                continue;
            }
            let winners = if self.areas[target].fixed {
                prior[target].clone()
            } else {
                self.sample_winners(target, &active)
            };
            trace!(target, winners = winners.len(), "projected");
            let source_names = active.iter().map(|(s, _)| *s).collect();
            staged.push((target, source_names, winners));
        }

        for &(target, _, ref winners) in &staged {
            self.area_mut(target).winners = winners.clone();
        }

        if self.disable_plasticity {
            return;
        }
        for &(target, ref sources, ref winners) in &staged {
            for &src in sources {
                let beta = self.beta(src, target);
                for &from_cell in &prior[src] {
                    for &to_cell in winners.iter() {
                        self.strengthen(src, target, from_cell, to_cell, beta);
                    }
                }
            }
        }
    }

    /// Winner-take-all over summed synaptic input. Candidates are every
    /// addressable cell (explicit areas) or the recruited support plus up
    /// to k fresh cells whose input is drawn from the binomial over all
    /// active source winners. Ties resolve to established cells, then to
    /// the lower index, keeping selection deterministic.
    fn sample_winners(&mut self, target: AreaName, active: &[(AreaName, Vec<usize>)]) -> Vec<usize> {
        let (k, explicit, floor, pool, headroom) = {
            let area = &self.areas[target];
            let (floor, pool) = if area.explicit {
                (0, area.n)
            } else {
                (area.floor, area.support)
            };
            (area.k, area.explicit, floor, pool, area.n.saturating_sub(area.support))
        };

        let mut scored: Vec<(f64, Candidate)> = Vec::with_capacity(pool - floor + k);
        for cell in floor..pool {
            let mut input = 0.0;
            for &(src, ref winners) in active {
                for &w in winners.iter() {
                    input += self.synapse(src, target, w, cell);
                }
            }
            scored.push((input, Candidate::Existing(cell)));
        }

        if !explicit {
            let total_active: usize = active.iter().map(|(_, w)| w.len()).sum();
            for ordinal in 0..k.min(headroom) {
                let mut hits = 0usize;
                for _ in 0..total_active {
                    if self.rng.random_bool(self.p) {
                        hits += 1;
                    }
                }
                scored.push((hits as f64, Candidate::Fresh(ordinal)));
            }
        }

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0).then_with(|| match (a.1, b.1) {
                (Candidate::Existing(x), Candidate::Existing(y)) => x.cmp(&y),
                (Candidate::Existing(_), Candidate::Fresh(_)) => std::cmp::Ordering::Less,
                (Candidate::Fresh(_), Candidate::Existing(_)) => std::cmp::Ordering::Greater,
                (Candidate::Fresh(x), Candidate::Fresh(y)) => x.cmp(&y),
            })
        });

        let mut winners = Vec::with_capacity(k);
        for (input, candidate) in scored.into_iter().take(k) {
            match candidate {
                Candidate::Existing(cell) => winners.push(cell),
                Candidate::Fresh(_) => {
                    winners.push(self.recruit(target, active, input as usize));
                }
            }
        }
        winners.sort_unstable();
        winners
    }

    /// Recruit a never-fired cell: give it the next support index and wire
    /// its sampled input count to randomly chosen active source winners.
    fn recruit(&mut self, target: AreaName, active: &[(AreaName, Vec<usize>)], hits: usize) -> usize {
        let cell = {
            let area = self.area_mut(target);
            let cell = area.support;
            area.support += 1;
            cell
        };

        let total_active: usize = active.iter().map(|(_, w)| w.len()).sum();
        let picks = rand::seq::index::sample(&mut self.rng, total_active, hits.min(total_active));
        for pick in picks {
            let mut offset = pick;
            for &(src, ref winners) in active {
                if offset < winners.len() {
                    self.weights
                        .entry((src, target))
                        .or_default()
                        .insert((winners[offset], cell), 1.0);
                    break;
                }
                offset -= winners.len();
            }
        }
        cell
    }

    /// Weight of one synapse, Bernoulli-sampled on first query.
    fn synapse(&mut self, from: AreaName, to: AreaName, i: usize, j: usize) -> f64 {
        if let Some(&w) = self.weights.get(&(from, to)).and_then(|t| t.get(&(i, j))) {
            return w;
        }
        let w = if self.rng.random_bool(self.p) { 1.0 } else { 0.0 };
        self.weights.entry((from, to)).or_default().insert((i, j), w);
        w
    }

    fn strengthen(&mut self, from: AreaName, to: AreaName, i: usize, j: usize, beta: f64) {
        let w = self.synapse(from, to, i, j);
        if w > 0.0
            && let Some(slot) = self
                .weights
                .get_mut(&(from, to))
                .and_then(|t| t.get_mut(&(i, j)))
        {
            *slot = w * (1.0 + beta);
        }
    }

    fn beta(&self, from: AreaName, to: AreaName) -> f64 {
        match self.betas.get(&(from, to)) {
            Some(&beta) => beta,
            None => self.areas[to].beta,
        }
    }
}
