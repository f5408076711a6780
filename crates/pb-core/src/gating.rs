use std::collections::{BTreeMap, BTreeSet};

use pb_sim::AreaName;

use crate::rules::{GateOp, Rule};

/// Canonical unordered key, so the gate for (A,B) and (B,A) is one entry
/// and the two directions can never disagree.
fn pair(a: AreaName, b: AreaName) -> (AreaName, AreaName) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Reason-set gating over areas and fibers.
///
/// Every gate holds a set of integer reason indices and is open only while
/// the set is empty. Everything starts closed under reason 0; the initially
/// active areas have that reason lifted at construction.
#[derive(Clone, Debug)]
pub struct GateMap {
    areas: BTreeMap<AreaName, BTreeSet<u32>>,
    fibers: BTreeMap<(AreaName, AreaName), BTreeSet<u32>>,
}

impl GateMap {
    pub fn new(areas: &[AreaName], initial_active: &[AreaName]) -> Self {
        let mut gates = Self {
            areas: BTreeMap::new(),
            fibers: BTreeMap::new(),
        };
        for (i, &a) in areas.iter().enumerate() {
            gates.areas.insert(a, BTreeSet::from([0]));
            for &b in &areas[i + 1..] {
                gates.fibers.insert(pair(a, b), BTreeSet::from([0]));
            }
        }
        for &a in initial_active {
            if let Some(reasons) = gates.areas.get_mut(a) {
                reasons.remove(&0);
            }
        }
        gates
    }

    /// Apply one rule. Both rule kinds mutate a single reason set; fiber
    /// rules hit the canonical entry shared by both directions.
    pub fn apply(&mut self, rule: &Rule) {
        match *rule {
            Rule::Area { op, area, index } => {
                let reasons = self.areas.entry(area).or_default();
                match op {
                    GateOp::Inhibit => {
                        reasons.insert(index);
                    }
                    GateOp::Disinhibit => {
                        reasons.remove(&index);
                    }
                }
            }
            Rule::Fiber { op, from, to, index } => {
                let reasons = self.fibers.entry(pair(from, to)).or_default();
                match op {
                    GateOp::Inhibit => {
                        reasons.insert(index);
                    }
                    GateOp::Disinhibit => {
                        reasons.remove(&index);
                    }
                }
            }
        }
    }

    pub fn area_open(&self, area: AreaName) -> bool {
        self.areas.get(area).is_none_or(BTreeSet::is_empty)
    }

    pub fn fiber_open(&self, a: AreaName, b: AreaName) -> bool {
        self.fibers.get(&pair(a, b)).is_none_or(BTreeSet::is_empty)
    }

    /// Current block set of a fiber, in either orientation.
    pub fn fiber_reasons(&self, a: AreaName, b: AreaName) -> BTreeSet<u32> {
        self.fibers.get(&pair(a, b)).cloned().unwrap_or_default()
    }
}
