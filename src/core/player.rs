//! Player seats and per-player storage.
//!
//! ## PlayerId
//!
//! Seat index for 1-255 players. Turn order is seat order, wrapping.
//!
//! ## PlayerMap
//!
//! One value per seat, indexable by `PlayerId`. Used for reserve pools,
//! maxn score vectors and win flags.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier. Seats are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that moves after this one.
    #[must_use]
    pub const fn next(self, player_count: usize) -> Self {
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    /// Iterate over all seats of a game with `player_count` players.
    ///
    /// ```
    /// use boardcore::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Parse the protocol token form `P<n>`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let digits = token.strip_prefix('P').or_else(|| token.strip_prefix('p'))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u8>().ok().map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Per-seat storage with O(1) access.
///
/// ```
/// use boardcore::core::{PlayerId, PlayerMap};
///
/// let mut wins: PlayerMap<bool> = PlayerMap::with_value(2, false);
/// wins[PlayerId::new(1)] = true;
/// assert!(wins[PlayerId::new(1)]);
/// assert!(!wins[PlayerId::new(0)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build one entry per seat from a factory.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            data: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    /// All seats share a cloned value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// All seats start from `T::default()`.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (seat, value) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId(0).next(2), PlayerId(1));
        assert_eq!(PlayerId(1).next(2), PlayerId(0));
        assert_eq!(PlayerId(2).next(4), PlayerId(3));
        assert_eq!(PlayerId(3).next(4), PlayerId(0));
    }

    #[test]
    fn test_token_round_trip() {
        for seat in PlayerId::all(12) {
            assert_eq!(PlayerId::from_token(&seat.to_string()), Some(seat));
        }
        assert_eq!(PlayerId::from_token("p3"), Some(PlayerId(3)));
        assert_eq!(PlayerId::from_token("P"), None);
        assert_eq!(PlayerId::from_token("Px"), None);
        assert_eq!(PlayerId::from_token("A"), None);
        assert_eq!(PlayerId::from_token("P999"), None);
    }

    #[test]
    fn test_player_map_factory() {
        let map: PlayerMap<usize> = PlayerMap::new(3, |p| p.index() * 10);
        let pairs: Vec<_> = map.iter().map(|(p, v)| (p.0, *v)).collect();
        assert_eq!(pairs, vec![(0, 0), (1, 10), (2, 20)]);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<Vec<u16>> = PlayerMap::with_default(2);
        map[PlayerId(1)].push(7);

        assert!(map[PlayerId(0)].is_empty());
        assert_eq!(map[PlayerId(1)], vec![7]);
        assert_eq!(map.player_count(), 2);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
