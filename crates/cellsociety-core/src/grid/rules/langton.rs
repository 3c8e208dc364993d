use super::super::Grid;
use crate::cell::{CellData, CellType, LangtonCell, LoopCorner, LoopProgram};
use crate::constants::{
    LOOP_PROGRAM_TICKS, LOOP_SEVER_TICK, LOOP_SIDE_LENGTH, LOOP_SPACING, LOOP_TURN_EVERY,
};
use crate::error::{EngineError, InternalError};
use tracing::debug;

pub const EMPTY: CellType = 0;
pub const SHEATH: CellType = 1;
/// Gene that seeds the bridge of a child loop.
pub const BRIDGE: CellType = 4;

/// Genes left on the branch when it is cut: one full loop minus the junction.
const CHILD_GENES: usize = LOOP_SIDE_LENGTH * 4 - 1;

/// Quarter turn counter-clockwise of a linear step.
fn turn_left(step: isize, width: isize) -> isize {
    match step {
        s if s == -width => -1,
        -1 => width,
        s if s == width => 1,
        _ => -width,
    }
}

impl Grid {
    fn langton(&self, pos: usize) -> Option<&LangtonCell> {
        match self.cells[pos].data() {
            CellData::Langton(l) => Some(l),
            _ => None,
        }
    }

    fn langton_mut(&mut self, pos: usize) -> Option<&mut LangtonCell> {
        match self.cells[pos].data_mut() {
            CellData::Langton(l) => Some(l),
            _ => None,
        }
    }

    fn is_sheath_at(&self, pos: isize) -> bool {
        usize::try_from(pos)
            .ok()
            .and_then(|p| self.cells.get(p))
            .is_some_and(|c| c.state() == SHEATH)
    }

    /// Linear step inside the backing array. Rows are not respected, only the
    /// ends of the array.
    fn shift(&self, junction: usize, pos: usize, delta: isize) -> Result<usize, InternalError> {
        pos.checked_add_signed(delta)
            .filter(|&p| p < self.cells.len())
            .ok_or(InternalError::OutsideGrid { junction })
    }

    fn is_junction(&self, pos: usize) -> bool {
        self.cells[pos]
            .neighbors()
            .iter()
            .filter(|&&n| self.state_of(n) == SHEATH)
            .count()
            == 1
    }

    fn classify_corner(&self, junction: usize) -> Result<LoopCorner, InternalError> {
        let t = junction as isize;
        let w = self.width as isize;
        let side = LOOP_SIDE_LENGTH as isize;
        let total = self.cells.len() as isize;
        let mut corner = None;
        if t + w * side < total - 1 {
            if self.is_sheath_at(t + side) && self.is_sheath_at(t + w * side) {
                corner = Some(LoopCorner::TopLeft);
            } else if self.is_sheath_at(t - side) && self.is_sheath_at(t + w * side) {
                corner = Some(LoopCorner::TopRight);
            }
        }
        if t - w * side > 0 {
            if self.is_sheath_at(t + side) && self.is_sheath_at(t - w * side) {
                corner = Some(LoopCorner::BottomLeft);
            } else if self.is_sheath_at(t - side) && self.is_sheath_at(t - w * side) {
                corner = Some(LoopCorner::BottomRight);
            }
        }
        corner.ok_or(InternalError::UnclassifiedCorner { junction })
    }

    /// Read the loop around a fresh junction and locate the end of its branch.
    fn capture_loop(&self, junction: usize) -> Result<LoopProgram, InternalError> {
        let w = self.width as isize;
        let corner = self.classify_corner(junction)?;

        let mut step = match corner {
            LoopCorner::TopRight => -1,
            LoopCorner::TopLeft => w,
            LoopCorner::BottomRight => -w,
            LoopCorner::BottomLeft => 1,
        };
        let mut perimeter = Vec::with_capacity(4 * (LOOP_SIDE_LENGTH - 1));
        let mut current = junction;
        for _ in 0..4 {
            for _ in 0..LOOP_SIDE_LENGTH - 1 {
                current = self.shift(junction, current, step)?;
                perimeter.push(current);
            }
            step = turn_left(step, w);
        }
        let genes = perimeter.iter().map(|&p| self.state_of(p)).collect();

        let t = junction as isize;
        let (horizontal, vertical) = match corner {
            LoopCorner::TopRight => (t + 1, t - w),
            LoopCorner::TopLeft => (t - 1, t - w),
            LoopCorner::BottomRight => (t + 1, t + w),
            LoopCorner::BottomLeft => {
                return Err(InternalError::UnresolvedBranchDirection { junction, corner });
            }
        };
        let branch_step = if self.is_sheath_at(horizontal) {
            vertical - t
        } else {
            horizontal - t
        };

        let mut replicant_positions = Vec::new();
        let mut replicant_genes = Vec::new();
        let mut scan = self.shift(junction, junction, branch_step)?;
        while self.state_of(scan) != SHEATH {
            replicant_positions.push(scan);
            replicant_genes.push(self.state_of(scan));
            scan = self.shift(junction, scan, branch_step)?;
        }
        let branch_end = self.shift(junction, scan, -branch_step)?;

        Ok(LoopProgram {
            corner,
            perimeter,
            genes,
            branch_step,
            branch_end,
            replicant_positions,
            replicant_genes,
            cursor: 1,
        })
    }

    /// Close the empty sides of the branch tip with sheath. Cells already
    /// claimed this tick, such as a freshly seeded bridge, are left alone.
    fn cap_branch_end(&mut self, end: usize) {
        let open: Vec<usize> = self.cells[end]
            .neighbors()
            .iter()
            .copied()
            .filter(|&n| self.state_of(n) == EMPTY && self.pending_of(n) == EMPTY)
            .collect();
        for n in open {
            self.write_pending(n, SHEATH);
        }
    }

    fn grow_branch(&mut self, program: &mut LoopProgram) {
        program.replicant_positions.push(program.branch_end);
        program.replicant_genes.push(EMPTY);
        self.cap_branch_end(program.branch_end);
    }

    fn extend_branch(
        &mut self,
        junction: usize,
        program: &mut LoopProgram,
    ) -> Result<(), InternalError> {
        program.branch_end = self.shift(junction, program.branch_end, program.branch_step)?;
        self.grow_branch(program);
        Ok(())
    }

    fn turn_branch(
        &mut self,
        junction: usize,
        program: &mut LoopProgram,
    ) -> Result<(), InternalError> {
        program.branch_step = turn_left(program.branch_step, self.width as isize);
        program.branch_end = self.shift(junction, program.branch_end, program.branch_step)?;
        self.grow_branch(program);
        Ok(())
    }

    /// Push the junction's gene onto the branch, dropping the gene at its tip.
    fn replicate_genes(&mut self, junction: usize, program: &mut LoopProgram) {
        let head = self.state_of(junction);
        program.replicant_genes.pop();
        program.replicant_genes.insert(0, head);
        for (&p, &g) in program
            .replicant_positions
            .iter()
            .zip(program.replicant_genes.iter())
        {
            self.write_pending(p, g);
        }
    }

    /// Cut the child loop free and seed the bridge of the next junction.
    fn sever_branch(
        &mut self,
        junction: usize,
        program: &mut LoopProgram,
    ) -> Result<(), InternalError> {
        self.extend_branch(junction, program)?;
        self.replicate_genes(junction, program);

        let len = program.replicant_positions.len();
        if len < CHILD_GENES {
            return Err(InternalError::ShortBranch {
                junction,
                actual: len,
                required: CHILD_GENES,
            });
        }
        let cut = len - CHILD_GENES;
        let step = program.branch_step;
        self.write_pending(program.replicant_positions[0], SHEATH);
        for &p in program.replicant_positions.iter().take(cut).skip(1) {
            let ahead = self.shift(junction, p, step)?;
            let behind = self.shift(junction, p, -step)?;
            for q in [p, ahead, behind] {
                self.write_pending(q, EMPTY);
            }
        }
        self.write_pending(program.replicant_positions[cut], SHEATH);

        let w = self.width as isize;
        let side = LOOP_SIDE_LENGTH as isize;
        let offset = match program.corner {
            LoopCorner::TopRight => -side - 1 - step,
            LoopCorner::TopLeft => w * (side - 1) - step,
            LoopCorner::BottomRight => -w * (side - 1) - step,
            LoopCorner::BottomLeft => side - 1 + step,
        };
        let seed = self.shift(junction, junction, offset)?;
        self.write_pending(seed, BRIDGE);
        program.branch_end = seed;
        self.cap_branch_end(seed);
        for _ in 0..LOOP_SPACING + 3 {
            program.branch_end =
                self.shift(junction, program.branch_end, program.branch_step)?;
            self.cap_branch_end(program.branch_end);
        }
        debug!(junction, seed, "loop severed, bridge seeded");
        Ok(())
    }

    /// One program tick. Returns whether the program keeps running.
    fn run_loop_program(
        &mut self,
        junction: usize,
        program: &mut LoopProgram,
    ) -> Result<bool, InternalError> {
        program.genes.rotate_right(1);
        for (&p, &g) in program.perimeter.iter().zip(program.genes.iter()) {
            self.write_pending(p, g);
        }

        let cursor = program.cursor;
        if cursor < LOOP_SEVER_TICK {
            if cursor % LOOP_TURN_EVERY != 0 {
                self.extend_branch(junction, program)?;
            } else {
                self.turn_branch(junction, program)?;
            }
        }
        let running = if cursor == LOOP_SEVER_TICK {
            self.sever_branch(junction, program)?;
            false
        } else {
            self.replicate_genes(junction, program);
            true
        };
        program.cursor += 1;
        Ok(running && program.cursor < LOOP_PROGRAM_TICKS)
    }

    /// Detect a junction the first time a gene cell is seen, then drive its
    /// replication program one tick.
    pub(in crate::grid) fn decide_langton(&mut self, pos: usize) -> Result<(), EngineError> {
        let state = self.state_of(pos);
        let unchecked = self.langton(pos).is_some_and(|l| !l.junction_checked);
        if unchecked && state != EMPTY && state != SHEATH {
            let program = if self.is_junction(pos) {
                let program = self.capture_loop(pos)?;
                debug!(
                    junction = pos,
                    corner = ?program.corner,
                    branch = program.replicant_positions.len(),
                    "junction captured"
                );
                Some(Box::new(program))
            } else {
                None
            };
            if let Some(cell) = self.langton_mut(pos) {
                cell.junction_checked = true;
                cell.program = program;
            }
        }

        let Some(mut program) = self.langton_mut(pos).and_then(|l| l.program.take()) else {
            return Ok(());
        };
        let running = self.run_loop_program(pos, &mut program)?;
        if running {
            if let Some(cell) = self.langton_mut(pos) {
                cell.program = Some(program);
            }
        } else {
            debug!(junction = pos, "loop program finished");
        }
        Ok(())
    }
}
