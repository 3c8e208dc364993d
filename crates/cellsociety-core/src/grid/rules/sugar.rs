use super::super::Grid;
use crate::cell::{CellData, CellType, SugarAgent, SugarPatch};

/// A patch that started without sugar.
pub const BARE: CellType = 0;
pub const AGENT: CellType = 1;
pub const PATCH: CellType = 2;

impl Grid {
    fn patch(&self, pos: usize) -> Option<&SugarPatch> {
        match self.cells[pos].data() {
            CellData::Sugar(p) => Some(p),
            _ => None,
        }
    }

    fn patch_mut(&mut self, pos: usize) -> Option<&mut SugarPatch> {
        match self.cells[pos].data_mut() {
            CellData::Sugar(p) => Some(p),
            _ => None,
        }
    }

    fn place_agent(&mut self, pos: usize, agent: Option<SugarAgent>) {
        if let Some(patch) = self.patch_mut(pos) {
            patch.agent = agent;
        }
        let state = if agent.is_some() { AGENT } else { PATCH };
        self.write_pending(pos, state);
        let vision = self.vision_of(pos);
        self.cells[pos].set_neighbors(vision);
    }

    /// Richest visible patch that is free now and after this tick. Ties go to
    /// the nearest ring, then to N, W, S, E.
    fn best_patch(&self, pos: usize) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for &n in self.cells[pos].neighbors() {
            if self.state_of(n) == AGENT || self.pending_of(n) == AGENT {
                continue;
            }
            let Some(sugar) = self.patch(n).map(|p| p.sugar) else {
                continue;
            };
            if best.is_none_or(|(_, top)| sugar > top) {
                best = Some((n, sugar));
            }
        }
        best.map(|(n, _)| n)
    }

    /// Grow the patch back, then let a resident agent starve or move.
    pub(in crate::grid) fn decide_sugar(&mut self, pos: usize) {
        let rate = self.config.sugar_growback_rate;
        let interval = self.config.sugar_growback_interval;
        let Some(patch) = self.patch_mut(pos) else {
            return;
        };
        if patch.growback_cycle >= interval {
            patch.sugar = patch.sugar.saturating_add(rate).min(patch.limit);
            patch.growback_cycle = 0;
        }
        patch.growback_cycle = patch.growback_cycle.saturating_add(1);
        let resident = patch.agent;

        if self.state_of(pos) != AGENT {
            return;
        }
        let Some(agent) = resident else {
            return;
        };
        if agent.reserve <= 0 {
            self.place_agent(pos, None);
            return;
        }
        let Some(target) = self.best_patch(pos) else {
            return;
        };
        let found = self
            .patch(target)
            .map_or(0, |p| i32::try_from(p.sugar).unwrap_or(i32::MAX));
        let moved = SugarAgent {
            reserve: agent
                .reserve
                .saturating_add(found)
                .saturating_sub(agent.metabolism),
            ..agent
        };
        self.place_agent(target, Some(moved));
        self.place_agent(pos, None);
    }
}
