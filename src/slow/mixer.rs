use byteorder::{ByteOrder, LittleEndian};
use once_cell::sync::Lazy;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

use super::random_math::{Program, REGISTERS};
use super::scratchpad::{HashState, Scratchpad};
use crate::hash::Hash;

/// Line is one 16 byte scratchpad line as two little endian words.
pub(crate) type Line = [u64; 2];

// Substitution table for the round function, derived once from a fixed seed.
static ROUND_TABLE: Lazy<[[u64; 256]; 2]> = Lazy::new(|| {
    let mut xof = Shake256::default();
    xof.update(b"cnhash round table");
    let mut bytes = [0u8; 2 * 256 * 8];
    xof.finalize_xof().read(&mut bytes);

    let mut table = [[0u64; 256]; 2];
    table
        .iter_mut()
        .zip(bytes.chunks_exact(256 * 8))
        .for_each(|(row, chunk)| LittleEndian::read_u64_into(chunk, row));
    table
});

/// Features selects the optional steps of the memory-hard loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Features {
    /// extra mixing in explode/implode plus the signed division step
    pub(crate) heavy: bool,
    /// perturb every line written back after the round
    pub(crate) tweak: bool,
    /// rotate the neighbouring lines of each accessed chunk
    pub(crate) shuffle: bool,
    /// integer division and square root feedback into the multiply
    pub(crate) int_math: bool,
}

/// round is the keyed substitution step applied to one line.
pub(crate) fn round(x: Line, key: Line) -> Line {
    let table = &*ROUND_TABLE;
    let sub = |w: u64| {
        w.to_le_bytes()
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, b)| {
                acc ^ table[i & 1][*b as usize].rotate_left(8 * i as u32)
            })
    };
    [
        sub(x[0]) ^ x[1].rotate_left(32) ^ key[0],
        sub(x[1]) ^ x[0].rotate_left(32) ^ key[1],
    ]
}

pub(crate) fn xor(a: Line, b: Line) -> Line {
    [a[0] ^ b[0], a[1] ^ b[1]]
}

pub(crate) fn add(a: Line, b: Line) -> Line {
    [a[0].wrapping_add(b[0]), a[1].wrapping_add(b[1])]
}

// full 64x64 -> 128 bit product as (high, low)
fn mul128(x: u64, y: u64) -> (u64, u64) {
    let p = u128::from(x) * u128::from(y);
    ((p >> 64) as u64, p as u64)
}

fn isqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while u128::from(r) * u128::from(r) > u128::from(n) {
        r -= 1;
    }
    while u128::from(r + 1) * u128::from(r + 1) <= u128::from(n) {
        r += 1;
    }
    r
}

/// run is the whole slow hash over a prepared state: explode the state into the
/// scratchpad, run `iterations` rounds of the memory-hard loop, implode and hash.
pub(crate) fn run(
    pad: &mut Scratchpad,
    iterations: usize,
    mut state: HashState,
    features: Features,
    program: Option<&Program>,
) -> Hash {
    pad.explode(&state, features.heavy);

    let k = *state.words();
    let mut a: Line = [k[0] ^ k[4], k[1] ^ k[5]];
    let mut b: Line = [k[2] ^ k[6], k[3] ^ k[7]];
    let mut b1: Line = [k[8] ^ k[10], k[9] ^ k[11]];
    let tweak = k[24];
    let mut division = k[12];
    let mut sqrt = k[13];
    let mut regs = [0u32; REGISTERS];
    regs[..4].copy_from_slice(&[
        k[14] as u32,
        (k[14] >> 32) as u32,
        k[15] as u32,
        (k[15] >> 32) as u32,
    ]);

    (0..iterations).for_each(|_| {
        let j = pad.line_index(a[0]);
        let c = round(pad.read(j), a);
        if features.shuffle {
            pad.shuffle(j, a, b, b1);
        }
        let mut stored = xor(b, c);
        if features.tweak {
            stored[1] ^= tweak.rotate_left((c[0] & 63) as u32);
        }
        pad.write(j, stored);

        let idx = pad.line_index(c[0]);
        let mut d = pad.read(idx);
        if features.int_math {
            d[0] ^= division ^ (sqrt << 32);
            let divisor =
                u64::from((c[0] as u32).wrapping_add((sqrt as u32) << 1) | 0x8000_0001);
            division = (c[1] / divisor & 0xffff_ffff) | ((c[1] % divisor) << 32);
            sqrt = isqrt(c[0].wrapping_add(division));
        }
        if let Some(program) = program {
            regs[4] = a[0] as u32;
            regs[5] = a[1] as u32;
            regs[6] = b[0] as u32;
            regs[7] = b[1] as u32;
            regs[8] = b1[0] as u32;
            program.execute(&mut regs);
            d[0] ^= u64::from(regs[2] ^ regs[3]) | (u64::from(regs[0] ^ regs[1]) << 32);
        }

        let (hi, lo) = mul128(c[0], d[0]);
        if features.shuffle {
            pad.shuffle(idx, a, b, b1);
        }
        a = add(a, [hi, lo]);
        pad.write(idx, a);
        a = xor(a, d);

        if features.heavy {
            let h = pad.line_index(a[0]);
            let line = pad.read(h);
            let n = line[0] as i64;
            let q = n.wrapping_div(i64::from(line[1] as i32 | 0x5));
            pad.write(h, [(n ^ q) as u64, line[1]]);
            a[0] ^= q as u64;
        }

        b1 = b;
        b = c;
    });

    pad.implode(&mut state, features.heavy);
    state.finalize()
}
