//! Dice sources for move distances.
//!
//! The engine never draws randomness on its own: every roll comes from a
//! [`DiceSource`] handed to the turn controller, so tests can script the
//! exact sequence of moves.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, instrument, warn};

/// Lowest face of the die.
pub const MIN_ROLL: u8 = 1;
/// Highest face of the die.
pub const MAX_ROLL: u8 = 6;

/// Produces move distances uniformly distributed over `[MIN_ROLL, MAX_ROLL]`.
pub trait DiceSource {
    /// Rolls the die.
    fn roll(&mut self) -> u8;
}

impl<D: DiceSource + ?Sized> DiceSource for &mut D {
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll(&mut self) -> u8 {
        (**self).roll()
    }
}

pub(crate) fn clamp_face(value: u8) -> u8 {
    if !(MIN_ROLL..=MAX_ROLL).contains(&value) {
        warn!(value, "Die face out of range, clamping");
    }
    value.clamp(MIN_ROLL, MAX_ROLL)
}

/// Reproducible die backed by a seeded ChaCha generator.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededDice {
    /// Creates a die from a seed.
    #[instrument]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a die with a random seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Returns the seed this die was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceSource for SeededDice {
    fn roll(&mut self) -> u8 {
        let value = self.rng.gen_range(MIN_ROLL..=MAX_ROLL);
        debug!(value, "Rolled die");
        value
    }
}

/// Replays a fixed sequence of faces, starting over when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Creates a scripted die. Faces outside `[1, 6]` are clamped; an
    /// empty script always rolls `MIN_ROLL`.
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        Self {
            faces: faces.into(),
            next: 0,
        }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        if self.faces.is_empty() {
            return MIN_ROLL;
        }
        let value = self.faces[self.next % self.faces.len()];
        self.next += 1;
        clamp_face(value)
    }
}

/// Wraps any closure as a die.
pub struct FnDice<F> {
    draw: F,
}

impl<F: FnMut() -> u8> FnDice<F> {
    /// Creates a die drawing faces from `draw`.
    pub fn new(draw: F) -> Self {
        Self { draw }
    }
}

impl<F> fmt::Debug for FnDice<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDice").finish_non_exhaustive()
    }
}

impl<F: FnMut() -> u8> DiceSource for FnDice<F> {
    fn roll(&mut self) -> u8 {
        clamp_face((self.draw)())
    }
}
