//! Fixed random salts for one board layout.
//!
//! Built once from the layout's literal seed and shared (behind an `Arc`)
//! by every clone of every board with that layout. Nothing here is ever
//! regenerated, so a digest computed today matches one computed on a
//! replay tomorrow.

use crate::core::{ChipId, GameRng, PlayerId};
use crate::rules::BoardLayout;

#[derive(Debug)]
pub struct DigestKeys {
    cell_salts: Vec<u64>,
    pool_salts: Vec<u64>,
    chip_keys: Vec<u64>,
    seed: u64,
    pub(crate) picked_salt: u64,
    pub(crate) source_salt: u64,
    pub(crate) dest_salt: u64,
    pub(crate) state_salt: u64,
}

impl DigestKeys {
    #[must_use]
    pub fn new(layout: &BoardLayout) -> Self {
        let mut rng = GameRng::new(layout.digest_seed);
        let cell_salts = (0..layout.cell_count()).map(|_| rng.next_salt()).collect();
        let pool_salts = (0..layout.player_count * layout.pool_slots as usize)
            .map(|_| rng.next_salt())
            .collect();
        let chip_keys = (0..layout.chip_kinds).map(|_| rng.next_salt()).collect();
        Self {
            cell_salts,
            pool_salts,
            chip_keys,
            seed: layout.digest_seed,
            picked_salt: rng.next_salt(),
            source_salt: rng.next_salt(),
            dest_salt: rng.next_salt(),
            state_salt: rng.next_salt(),
        }
    }

    #[must_use]
    pub fn cell_salt(&self, cell: usize) -> u64 {
        self.cell_salts[cell]
    }

    #[must_use]
    pub fn pool_salt(&self, pool_index: usize) -> u64 {
        self.pool_salts[pool_index]
    }

    /// Key for a chip kind. Kinds beyond the layout's count are derived
    /// from the seed rather than drawn, so they are still stable.
    #[must_use]
    pub fn chip_key(&self, chip: ChipId) -> u64 {
        match self.chip_keys.get(chip.index()) {
            Some(&k) => k,
            None => splitmix64(self.seed ^ (chip.0 as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93)) | 1,
        }
    }

    /// Contribution of one stack of chips under `salt`. Position in the
    /// stack matters, so `[a, b]` and `[b, a]` differ.
    #[must_use]
    pub fn stack_digest(&self, salt: u64, chips: &[ChipId]) -> u64 {
        chips.iter().enumerate().fold(0u64, |acc, (i, &chip)| {
            acc.wrapping_add(
                self.chip_key(chip)
                    .wrapping_mul(salt)
                    .wrapping_mul(i as u64 + 1),
            )
        })
    }

    /// Contribution of the finite state and the player to move.
    #[must_use]
    pub fn turn_digest(&self, ordinal: u64, whose_turn: PlayerId) -> u64 {
        (ordinal * 10 + whose_turn.0 as u64).wrapping_mul(self.state_salt)
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
