#![warn(missing_docs)]
//! The hashing core of a CryptoNote node.
//!
//! This library provides the fixed size digest types, the Keccak based fast hash,
//! a dispatcher over the memory-hard slow hash variants, and the CryptoNote tree
//! hash used for transaction roots and merge mining proofs.
//!
//! The slow hash engines follow the shape of the CryptoNight family (scratchpad
//! explode, memory-hard loop, implode) but are not bit compatible with any live
//! network's proof of work.
//!
//! # Example
//! ```
//! use anyhow::Result;
//! use cnhash::slow::{HashVariant, SlowHashConfig, SlowHashContext};
//! use cnhash::{fast_hash, tree};
//!
//! fn main() -> Result<()> {
//!   let leaves = [fast_hash(b"coinbase"), fast_hash(b"tx1"), fast_hash(b"tx2")];
//!   let root = tree::root(&leaves);
//!   let branch = tree::branch_at(&leaves, 2);
//!   assert!(branch.verify(&leaves[2], &root));
//!   println!("Root: {}", root);
//!
//!   let mut ctx = SlowHashContext::with_config(SlowHashConfig {
//!     heavy_memory: 1 << 14,
//!     heavy_iterations: 1 << 10,
//!     cn_memory: 1 << 14,
//!     cn_iterations: 1 << 10,
//!   })?;
//!   let pow = ctx.hash_with_params(b"block blob", HashVariant::CnR, 4, 1_000);
//!   println!("PoW: {}", pow);
//!
//!   Ok(())
//! }
//! ```
/// `hash` holds the digest types and the fast hash.
pub mod hash;
/// `slow` dispatches the memory-hard slow hash variants.
pub mod slow;
/// `tree` computes tree roots and inclusion branches.
pub mod tree;

pub use hash::{fast_hash, fast_hash_pair, Hash, Hash8, NULL_HASH, NULL_HASH8};
