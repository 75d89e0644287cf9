use byteorder::{ByteOrder, LittleEndian};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

/// Number of 32 bit registers a program sees.
pub(crate) const REGISTERS: usize = 9;

// only r0..r3 are written; r4..r8 are reloaded from the loop state every iteration
const WRITABLE: usize = 4;

const MIN_LEN: usize = 60;
const EXTRA_LEN: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Opcode {
    Mul,
    Add(u32),
    Sub,
    Ror,
    Rol,
    Xor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Instruction {
    op: Opcode,
    dst: usize,
    src: usize,
}

/// Program is the sequence of integer operations mixed into the memory-hard loop
/// of the random math variant. It is a pure function of the block height, so all
/// nodes hashing at the same height run the same program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Program {
    height: u64,
    code: Vec<Instruction>,
}

impl Program {
    pub(crate) fn generate(height: u64) -> Self {
        let mut xof = Shake256::default();
        xof.update(b"cnhash random math");
        xof.update(&height.to_le_bytes());
        let mut reader = xof.finalize_xof();

        let mut header = [0u8; 1];
        reader.read(&mut header);
        let len = MIN_LEN + header[0] as usize % EXTRA_LEN;

        let code = (0..len)
            .map(|_| {
                let mut raw = [0u8; 8];
                reader.read(&mut raw);

                let op = match raw[0] % 6 {
                    0 => Opcode::Mul,
                    1 => Opcode::Add(LittleEndian::read_u32(&raw[4..])),
                    2 => Opcode::Sub,
                    3 => Opcode::Ror,
                    4 => Opcode::Rol,
                    _ => Opcode::Xor,
                };
                let dst = raw[1] as usize % WRITABLE;
                let mut src = raw[2] as usize % REGISTERS;
                // a - a and a ^ a would zero the register
                if src == dst && matches!(op, Opcode::Sub | Opcode::Xor) {
                    src = WRITABLE + dst;
                }
                Instruction { op, dst, src }
            })
            .collect();

        Self { height, code }
    }

    pub(crate) fn height(&self) -> u64 {
        self.height
    }

    pub(crate) fn len(&self) -> usize {
        self.code.len()
    }

    pub(crate) fn execute(&self, r: &mut [u32; REGISTERS]) {
        self.code.iter().for_each(|ins| {
            let s = r[ins.src];
            let d = r[ins.dst];
            r[ins.dst] = match ins.op {
                Opcode::Mul => d.wrapping_mul(s),
                Opcode::Add(c) => d.wrapping_add(s).wrapping_add(c),
                Opcode::Sub => d.wrapping_sub(s),
                Opcode::Ror => d.rotate_right(s),
                Opcode::Rol => d.rotate_left(s),
                Opcode::Xor => d ^ s,
            };
        })
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn generation_is_keyed_by_height() {
        assert_eq!(Program::generate(1000), Program::generate(1000));
        assert_ne!(Program::generate(1000).code, Program::generate(1001).code);
        assert_eq!(Program::generate(42).height(), 42);
    }

    #[test]
    fn program_shape() {
        (0..64).for_each(|height| {
            let p = Program::generate(height);
            assert!(p.len() >= MIN_LEN && p.len() < MIN_LEN + EXTRA_LEN);
            p.code.iter().for_each(|ins| {
                assert!(ins.dst < WRITABLE);
                assert!(ins.src < REGISTERS);
                if matches!(ins.op, Opcode::Sub | Opcode::Xor) {
                    assert_ne!(ins.src, ins.dst);
                }
            });
        })
    }

    #[test]
    fn execute_leaves_inputs_alone() {
        let p = Program::generate(5);
        let mut r = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        p.execute(&mut r);
        assert_eq!(&r[WRITABLE..], &[5, 6, 7, 8, 9]);

        let mut again = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        p.execute(&mut again);
        assert_eq!(r, again);
    }

    #[test]
    fn single_instructions() {
        let program = |op, dst, src| Program {
            height: 0,
            code: vec![Instruction { op, dst, src }],
        };
        let mut r = [0u32; REGISTERS];
        r[0] = 0x8000_0001;
        r[5] = 1;

        let mut x = r;
        program(Opcode::Rol, 0, 5).execute(&mut x);
        assert_eq!(x[0], 0x0000_0003);

        let mut x = r;
        program(Opcode::Ror, 0, 5).execute(&mut x);
        assert_eq!(x[0], 0xc000_0000);

        let mut x = r;
        program(Opcode::Add(10), 0, 5).execute(&mut x);
        assert_eq!(x[0], 0x8000_000c);

        let mut x = r;
        program(Opcode::Sub, 1, 5).execute(&mut x);
        assert_eq!(x[1], u32::MAX);

        let mut x = r;
        program(Opcode::Mul, 0, 0).execute(&mut x);
        assert_eq!(x[0], 0x0000_0001);
    }
}
