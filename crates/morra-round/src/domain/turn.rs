//! Turn resolution: a player's private throw and their call for the round.

use morra_core::error::DomainError;
use morra_core::rng::DeterministicRng;

/// Smallest value a hand can show.
pub const THROW_MIN: u32 = 1;

/// Largest value a hand can show.
pub const THROW_MAX: u32 = 5;

/// Upper bound on the player count accepted for a single turn.
pub const MAX_PLAYER_COUNT: u32 = 1_000;

/// A resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    /// The player's own throw, in `[THROW_MIN, THROW_MAX]`.
    pub throw: u32,
    /// The player's estimate of the sum of every throw in the round.
    pub call: u64,
}

impl Turn {
    /// Resolves a turn for a round with `player_count` players.
    ///
    /// The call is the player's own throw plus one independent draw for each
    /// of the other `player_count - 1` players, so it always lies in
    /// `[player_count, THROW_MAX * player_count]`. A `player_count` of zero
    /// degenerates to `call == throw`; callers reject it beforehand with
    /// [`validate_player_count`].
    pub fn resolve(player_count: u32, rng: &mut dyn DeterministicRng) -> Self {
        let throw = rng.next_u32_range(THROW_MIN, THROW_MAX);
        let call = (1..player_count).fold(u64::from(throw), |call, _| {
            call + u64::from(rng.next_u32_range(THROW_MIN, THROW_MAX))
        });
        Self { throw, call }
    }
}

/// Checks that a player count describes a playable round.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `player_count` is zero or larger than
/// [`MAX_PLAYER_COUNT`].
pub fn validate_player_count(player_count: u32) -> Result<(), DomainError> {
    if player_count == 0 {
        return Err(DomainError::Validation(
            "player count must be at least 1".to_owned(),
        ));
    }
    if player_count > MAX_PLAYER_COUNT {
        return Err(DomainError::Validation(format!(
            "player count must not exceed {MAX_PLAYER_COUNT}"
        )));
    }
    Ok(())
}
