use anyhow::{ensure, Result};
use digest::Digest;
use sha3::Keccak256;
use std::fmt;
use std::str::FromStr;

/// The size in bytes of a full hash.
pub const HASH_SIZE: usize = 32;

/// The size in bytes of a short hash.
pub const HASH8_SIZE: usize = 8;

/// FixedHash is an immutable N byte digest value.
///
/// Equality and ordering are byte-wise lexicographic over the storage order,
/// and the textual form is lowercase hex of the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedHash<const N: usize>([u8; N]);

/// A 32 byte hash, the output of both the fast and the slow hash.
pub type Hash = FixedHash<HASH_SIZE>;

/// An 8 byte hash, used where a truncated identifier is enough.
pub type Hash8 = FixedHash<HASH8_SIZE>;

/// The all zero hash, meaning "absent".
pub const NULL_HASH: Hash = FixedHash([0; HASH_SIZE]);

/// The all zero short hash.
pub const NULL_HASH8: Hash8 = FixedHash([0; HASH8_SIZE]);

impl<const N: usize> FixedHash<N> {
    /// new wraps raw bytes.
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// from_slice copies a hash out of an untrusted buffer, which must be exactly N bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() == N,
            "bad hash size: want {}, got {}",
            N,
            bytes.len()
        );
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// as_bytes borrows the raw bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// to_bytes copies out the raw bytes.
    pub fn to_bytes(self) -> [u8; N] {
        self.0
    }

    /// is_null reports whether every byte is zero.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl<const N: usize> Default for FixedHash<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> From<[u8; N]> for FixedHash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> From<FixedHash<N>> for [u8; N] {
    fn from(h: FixedHash<N>) -> Self {
        h.0
    }
}

impl<const N: usize> AsRef<[u8]> for FixedHash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::LowerHex for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl<const N: usize> fmt::Display for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl<const N: usize> fmt::Debug for FixedHash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedHash<{}>({:x})", N, self)
    }
}

impl<const N: usize> FromStr for FixedHash<N> {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; N];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// fast_hash is the stateless Keccak-256 digest (original Keccak padding) of a buffer.
pub fn fast_hash(data: &[u8]) -> Hash {
    Hash::new(Keccak256::digest(data).into())
}

/// fast_hash_pair hashes the 64 byte concatenation `left || right`.
pub fn fast_hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Hash::new(hasher.finalize().into())
}

#[cfg(test)]
pub mod test {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    struct TestElement {
        input: &'static str,
        output: &'static str,
    }

    static TEST_VECTOR: &[TestElement] = &[
        TestElement {
            input: "",
            output: "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
        },
        TestElement {
            input: "abc",
            output: "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45",
        },
    ];

    #[test]
    fn test_vector() {
        TEST_VECTOR.iter().enumerate().for_each(|(i, element)| {
            let got = fast_hash(element.input.as_bytes()).to_string();
            assert_eq!(
                element.output, got,
                "test vector element mismatched on index {} failed! got {}, want {}",
                i, got, element.output
            );
        })
    }

    #[test]
    fn fast_hash_deterministic() {
        let data: Vec<u8> = (0..1000).map(|_| rand::random::<u8>()).collect();
        assert_eq!(fast_hash(&data), fast_hash(&data));
    }

    #[test]
    fn pair_matches_concatenation() {
        let a = fast_hash(b"left");
        let b = fast_hash(b"right");
        let mut buf = Vec::with_capacity(2 * HASH_SIZE);
        buf.extend_from_slice(a.as_bytes());
        buf.extend_from_slice(b.as_bytes());
        assert_eq!(fast_hash_pair(&a, &b), fast_hash(&buf));
        assert_ne!(fast_hash_pair(&a, &b), fast_hash_pair(&b, &a));
    }

    #[test]
    fn null_hashes() {
        assert!(NULL_HASH.is_null());
        assert!(NULL_HASH8.is_null());
        assert_eq!(Hash::default(), NULL_HASH);
        assert_eq!(Hash8::default(), NULL_HASH8);
        assert!(!fast_hash(b"").is_null());
        assert_eq!(NULL_HASH.to_string(), "0".repeat(64));
    }

    #[test]
    fn hex_round_trip() -> Result<()> {
        let h = fast_hash(b"cryptonote");
        let parsed: Hash = h.to_string().parse()?;
        assert_eq!(parsed, h);

        let short = Hash8::new([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]);
        assert_eq!(short.to_string(), "deadbeef00010203");
        assert_eq!(format!("{:x}", short), "deadbeef00010203");
        assert_eq!("deadbeef00010203".parse::<Hash8>()?, short);
        Ok(())
    }

    #[test]
    fn hex_parse_errors() {
        assert!("deadbeef".parse::<Hash>().is_err());
        assert!("zz".repeat(32).parse::<Hash>().is_err());
        assert!("00".repeat(9).parse::<Hash8>().is_err());
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Hash::from_slice(&[1u8; 31]).is_err());
        assert!(Hash::from_slice(&[1u8; 33]).is_err());
        assert_eq!(Hash::from_slice(&[1u8; 32]).unwrap(), Hash::new([1u8; 32]));
        assert_eq!(Hash8::from_slice(&[7u8; 8]).unwrap(), Hash8::new([7u8; 8]));
    }

    #[test]
    fn ordering_is_bytewise() {
        let mut lo = [0u8; HASH_SIZE];
        let mut hi = [0u8; HASH_SIZE];
        lo[0] = 1;
        lo[31] = 0xff;
        hi[0] = 2;
        assert!(Hash::new(lo) < Hash::new(hi));

        let set: BTreeSet<Hash> = [Hash::new(hi), Hash::new(lo), NULL_HASH].into_iter().collect();
        let ordered: Vec<Hash> = set.into_iter().collect();
        assert_eq!(ordered, vec![NULL_HASH, Hash::new(lo), Hash::new(hi)]);
    }

    #[test]
    fn usable_as_map_key() {
        let keys: HashSet<Hash> = (0u8..16).map(|i| fast_hash(&[i])).collect();
        assert_eq!(keys.len(), 16);
        assert!(keys.contains(&fast_hash(&[3])));
    }
}
