use anyhow::Result;
use tracing::trace;

use super::mixer::{self, Features};
use super::random_math::Program;
use super::scratchpad::{HashState, Scratchpad};
use crate::hash::Hash;

/// First variant number that mixes the height keyed random math program into the loop.
pub const RANDOM_MATH_VARIANT: u32 = 4;

/// CnState is the scratchpad of the cn family, kept apart from the heavy one,
/// together with the program generated for the last height seen.
pub(crate) struct CnState {
    pad: Scratchpad,
    iterations: usize,
    program: Option<Program>,
}

impl CnState {
    pub(crate) fn new(memory: usize, iterations: usize) -> Result<Self> {
        Ok(Self {
            pad: Scratchpad::allocate(memory)?,
            iterations,
            program: None,
        })
    }

    fn refresh_program(&mut self, height: u64) {
        if self.program.as_ref().map(Program::height) == Some(height) {
            return;
        }
        let program = Program::generate(height);
        trace!(height, len = program.len(), "generated random math program");
        self.program = Some(program);
    }

    #[cfg(test)]
    pub(crate) fn scratchpad(&self) -> &Scratchpad {
        &self.pad
    }
}

fn features(variant: u32) -> Features {
    match variant {
        0 => Features::default(),
        1 => Features {
            tweak: true,
            ..Default::default()
        },
        2 | 3 => Features {
            shuffle: true,
            int_math: true,
            ..Default::default()
        },
        _ => Features {
            shuffle: true,
            ..Default::default()
        },
    }
}

/// hash computes the cn family slow hash. `height` only matters from
/// RANDOM_MATH_VARIANT on. With `prehashed` the buffer is taken as the already
/// absorbed hash state and must be exactly STATE_SIZE bytes.
pub(crate) fn hash(
    state: &mut CnState,
    data: &[u8],
    variant: u32,
    prehashed: bool,
    height: u64,
) -> Hash {
    let initial = if prehashed {
        HashState::from_bytes(data)
    } else {
        HashState::absorb(data)
    };

    let program = if variant >= RANDOM_MATH_VARIANT {
        state.refresh_program(height);
        state.program.as_ref()
    } else {
        None
    };

    mixer::run(
        &mut state.pad,
        state.iterations,
        initial,
        features(variant),
        program,
    )
}
