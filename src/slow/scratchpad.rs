use anyhow::{Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

use super::mixer::{add, round, xor, Line};
use crate::hash::{fast_hash, Hash};

/// Size in bytes of the hash state absorbed from the input.
pub const STATE_SIZE: usize = 200;

const STATE_WORDS: usize = STATE_SIZE / 8;

// the 128 bytes of state that are spread over, and collected back from, the scratchpad
const TEXT_OFFSET: usize = 4;
const TEXT_LINES: usize = 8;

const HEAVY_MIX_ROUNDS: usize = 16;

/// HashState is the 200 byte state absorbed from the input before the
/// memory-hard loop and hashed again once the scratchpad is folded back in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HashState {
    words: [u64; STATE_WORDS],
}

impl HashState {
    pub(crate) fn absorb(data: &[u8]) -> Self {
        let mut xof = Shake256::default();
        xof.update(data);
        let mut bytes = [0u8; STATE_SIZE];
        xof.finalize_xof().read(&mut bytes);
        Self::from_bytes(&bytes)
    }

    /// from_bytes takes an already absorbed state, which must be exactly STATE_SIZE bytes.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() != STATE_SIZE {
            panic!(
                "bad hash state size: want {}, got {}",
                STATE_SIZE,
                bytes.len()
            );
        }
        let mut words = [0u64; STATE_WORDS];
        LittleEndian::read_u64_into(bytes, &mut words);
        Self { words }
    }

    pub(crate) fn to_bytes(&self) -> [u8; STATE_SIZE] {
        let mut bytes = [0u8; STATE_SIZE];
        LittleEndian::write_u64_into(&self.words, &mut bytes);
        bytes
    }

    pub(crate) fn words(&self) -> &[u64; STATE_WORDS] {
        &self.words
    }

    pub(crate) fn line(&self, i: usize) -> Line {
        [self.words[2 * i], self.words[2 * i + 1]]
    }

    fn text(&self) -> [Line; TEXT_LINES] {
        let mut text = [[0u64; 2]; TEXT_LINES];
        text.iter_mut()
            .enumerate()
            .for_each(|(i, line)| *line = self.line(TEXT_OFFSET + i));
        text
    }

    fn set_text(&mut self, text: &[Line; TEXT_LINES]) {
        text.iter().enumerate().for_each(|(i, line)| {
            let w = 2 * (TEXT_OFFSET + i);
            self.words[w] = line[0];
            self.words[w + 1] = line[1];
        });
    }

    pub(crate) fn finalize(&self) -> Hash {
        fast_hash(&self.to_bytes())
    }
}

/// Scratchpad is the large working memory of the memory-hard loop, addressed in
/// 16 byte lines. Its size is a power of two of at least 128 bytes.
pub(crate) struct Scratchpad {
    words: Vec<u64>,
}

impl Scratchpad {
    /// allocate reserves a zeroed scratchpad of `bytes` bytes. Failure to reserve
    /// the memory is returned rather than aborting.
    pub(crate) fn allocate(bytes: usize) -> Result<Self> {
        let len = bytes / 8;
        let mut words = Vec::new();
        words
            .try_reserve_exact(len)
            .with_context(|| format!("allocating {} byte scratchpad", bytes))?;
        words.resize(len, 0);
        Ok(Self { words })
    }

    /// size returns the scratchpad size in bytes.
    #[cfg(test)]
    pub(crate) fn size(&self) -> usize {
        self.words.len() * 8
    }

    fn lines(&self) -> usize {
        self.words.len() / 2
    }

    /// line_index maps a 64 bit word to the line it addresses.
    pub(crate) fn line_index(&self, a: u64) -> usize {
        (a >> 4) as usize & (self.lines() - 1)
    }

    pub(crate) fn read(&self, idx: usize) -> Line {
        [self.words[2 * idx], self.words[2 * idx + 1]]
    }

    pub(crate) fn write(&mut self, idx: usize, line: Line) {
        self.words[2 * idx] = line[0];
        self.words[2 * idx + 1] = line[1];
    }

    /// shuffle rotates the three other lines of the 64 byte chunk holding line `j`,
    /// adding a register to each.
    pub(crate) fn shuffle(&mut self, j: usize, a: Line, b: Line, b1: Line) {
        let c1 = self.read(j ^ 1);
        let c2 = self.read(j ^ 2);
        let c3 = self.read(j ^ 3);
        self.write(j ^ 1, add(c3, b1));
        self.write(j ^ 2, add(c1, b));
        self.write(j ^ 3, add(c2, a));
    }

    /// explode fills the whole scratchpad from the state.
    pub(crate) fn explode(&mut self, state: &HashState, heavy: bool) {
        let keys = [state.line(0), state.line(1)];
        let mut text = state.text();
        if heavy {
            (0..HEAVY_MIX_ROUNDS).for_each(|_| mix_text(&mut text, &keys));
        }

        self.words
            .chunks_exact_mut(2 * TEXT_LINES)
            .for_each(|chunk| {
                text.iter_mut()
                    .for_each(|line| *line = round(round(*line, keys[0]), keys[1]));
                chunk
                    .chunks_exact_mut(2)
                    .zip(text.iter())
                    .for_each(|(dst, line)| dst.copy_from_slice(line));
            });
    }

    /// implode folds the whole scratchpad back into the state. Heavy mode makes a
    /// second pass and mixes the lines together between passes.
    pub(crate) fn implode(&self, state: &mut HashState, heavy: bool) {
        let keys = [state.line(2), state.line(3)];
        let mut text = state.text();

        self.absorb_into(&mut text, &keys);
        if heavy {
            (0..HEAVY_MIX_ROUNDS).for_each(|_| mix_text(&mut text, &keys));
            self.absorb_into(&mut text, &keys);
            (0..HEAVY_MIX_ROUNDS).for_each(|_| mix_text(&mut text, &keys));
        }

        state.set_text(&text);
    }

    fn absorb_into(&self, text: &mut [Line; TEXT_LINES], keys: &[Line; 2]) {
        self.words.chunks_exact(2 * TEXT_LINES).for_each(|chunk| {
            text.iter_mut().enumerate().for_each(|(i, line)| {
                let src = [chunk[2 * i], chunk[2 * i + 1]];
                *line = round(xor(*line, src), keys[i & 1]);
            });
        });
    }

    #[cfg(test)]
    pub(crate) fn as_ptr(&self) -> *const u64 {
        self.words.as_ptr()
    }
}

fn mix_text(text: &mut [Line; TEXT_LINES], keys: &[Line; 2]) {
    let prev = *text;
    text.iter_mut().enumerate().for_each(|(i, line)| {
        let next = prev[(i + 1) % TEXT_LINES];
        *line = xor(round(prev[i], keys[i & 1]), next);
    });
}
