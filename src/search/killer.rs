//! Killer moves: two slots per ply, most recent first.

use crate::moves::MoveRecord;

#[derive(Clone, Debug, Default)]
pub struct KillerTable {
    slots: Vec<[Option<MoveRecord>; 2]>,
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `m` caused a cutoff at `ply`.
    pub fn record(&mut self, ply: usize, m: &MoveRecord) {
        if self.slots.len() <= ply {
            self.slots.resize_with(ply + 1, Default::default);
        }
        let row = &mut self.slots[ply];
        if row[0].as_ref().is_some_and(|k| k.same_specified_move(m)) {
            return;
        }
        row[1] = row[0].take();
        row[0] = Some(m.specification());
    }

    #[must_use]
    pub fn killers(&self, ply: usize) -> impl Iterator<Item = &MoveRecord> {
        self.slots.get(ply).into_iter().flatten().flatten()
    }

    /// Move killers for `ply` to the front of `moves`, keeping the relative
    /// order of everything else. Returns how many were promoted.
    pub fn promote(&self, ply: usize, moves: &mut Vec<MoveRecord>) -> usize {
        let mut promoted = 0;
        // second slot first so the newest killer ends up in front
        let killers: Vec<&MoveRecord> = self.killers(ply).collect();
        for k in killers.into_iter().rev() {
            if let Some(pos) = moves.iter().position(|m| m.same_specified_move(k)) {
                let m = moves.remove(pos);
                moves.insert(0, m);
                promoted += 1;
            }
        }
        promoted
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
