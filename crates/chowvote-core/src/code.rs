//! Party code generation.
//!
//! [`RandomCodes`] draws [`CODE_LENGTH`] characters uniformly from
//! [`CODE_ALPHABET`]. With only 36^4 codes collisions are possible, so the
//! registry re-rolls until it finds one that is not live. [`SequenceCodes`]
//! replays a fixed list and exists so tests can pin codes and collisions.

use std::collections::VecDeque;

use chowvote_types::{CODE_ALPHABET, CODE_LENGTH, PartyCode};
use rand::Rng;

/// A source of candidate party codes.
pub trait CodeSource: Send {
    /// Draw the next candidate. Candidates may repeat.
    fn next_code(&mut self) -> PartyCode;
}

/// Uniformly random codes from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&mut self) -> PartyCode {
        random_code(&mut rand::rng())
    }
}

/// Draw one random code from `rng`.
pub fn random_code(rng: &mut impl Rng) -> PartyCode {
    let code: String = (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET.get(idx).copied().map_or('A', char::from)
        })
        .collect();
    PartyCode::new(code)
}

/// Replays a fixed list of codes, then falls back to random ones.
#[derive(Debug, Default, Clone)]
pub struct SequenceCodes {
    queue: VecDeque<PartyCode>,
}

impl SequenceCodes {
    /// Create a source that yields `codes` in order.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: codes.into_iter().map(PartyCode::new).collect(),
        }
    }
}

impl CodeSource for SequenceCodes {
    fn next_code(&mut self) -> PartyCode {
        self.queue
            .pop_front()
            .unwrap_or_else(|| random_code(&mut rand::rng()))
    }
}
