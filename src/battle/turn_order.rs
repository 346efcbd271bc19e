//! Turn order resolution
//!
//! The faster creature acts first. Equal speed is settled by a coin flip
//! drawn from an injected [`RandomSource`], so tests can pin the outcome.

use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::creature::{Creature, Side, Skill};

/// Randomness capability handed to anything that needs to roll.
pub trait RandomSource {
    /// Unweighted coin flip
    fn coin_flip(&mut self) -> bool;
    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Seedable RNG used by every battle driver.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for GameRng {
    fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// One side's committed action for the turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnAction {
    pub side: Side,
    pub speed: i32,
    pub skill: Skill,
}

impl TurnAction {
    pub fn new(side: Side, creature: &Creature, skill: Skill) -> Self {
        Self {
            side,
            speed: creature.speed,
            skill,
        }
    }
}

/// Order two actions: higher speed first, coin flip on a tie.
///
/// The RNG is only consulted on a tie.
pub fn resolve_turn_order<R: RandomSource + ?Sized>(
    a: TurnAction,
    b: TurnAction,
    rng: &mut R,
) -> (TurnAction, TurnAction) {
    if a.speed > b.speed {
        (a, b)
    } else if b.speed > a.speed {
        (b, a)
    } else if rng.coin_flip() {
        (a, b)
    } else {
        (b, a)
    }
}
