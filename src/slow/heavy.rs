use anyhow::Result;

use super::mixer::{self, Features};
use super::scratchpad::{HashState, Scratchpad};
use crate::hash::Hash;

const V1: Features = Features {
    heavy: true,
    tweak: false,
    shuffle: false,
    int_math: false,
};

const V2: Features = Features {
    heavy: true,
    tweak: true,
    shuffle: false,
    int_math: false,
};

const V3: Features = Features {
    heavy: true,
    tweak: true,
    shuffle: true,
    int_math: true,
};

/// HeavyState is the one scratchpad all heavy variants of a context hash with.
pub(crate) struct HeavyState {
    pad: Scratchpad,
    iterations: usize,
}

impl HeavyState {
    pub(crate) fn new(memory: usize, iterations: usize) -> Result<Self> {
        Ok(Self {
            pad: Scratchpad::allocate(memory)?,
            iterations,
        })
    }

    #[cfg(test)]
    pub(crate) fn scratchpad(&self) -> &Scratchpad {
        &self.pad
    }
}

pub(crate) fn v1(state: &mut HeavyState, data: &[u8]) -> Hash {
    mixer::run(
        &mut state.pad,
        state.iterations,
        HashState::absorb(data),
        V1,
        None,
    )
}

pub(crate) fn v2(state: &mut HeavyState, data: &[u8]) -> Hash {
    mixer::run(
        &mut state.pad,
        state.iterations,
        HashState::absorb(data),
        V2,
        None,
    )
}

pub(crate) fn v3(state: &mut HeavyState, data: &[u8]) -> Hash {
    mixer::run(
        &mut state.pad,
        state.iterations,
        HashState::absorb(data),
        V3,
        None,
    )
}
