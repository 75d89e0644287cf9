use crate::hash::{fast_hash_pair, Hash};

/// Largest branch depth a `u64` path can describe.
pub const MAX_DEPTH: usize = u64::BITS as usize;

/// Branch is the inclusion proof of one leaf: the sibling hashes met while folding
/// the tree from that leaf to the root, plus the path that orders each fold.
///
/// Siblings are stored the way serialized proofs carry them: `siblings[depth - 1]`
/// sits next to the leaf and `siblings[0]` next to the root. Bit `d` of `path` is set
/// when the running hash is the right-hand operand at level `d`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    siblings: Vec<Hash>,
    path: u64,
}

impl Branch {
    /// new builds a branch from its parts. The sibling count must not exceed MAX_DEPTH.
    pub fn new(siblings: Vec<Hash>, path: u64) -> Self {
        if siblings.len() > MAX_DEPTH {
            panic!(
                "branch too deep: {} siblings, at most {}",
                siblings.len(),
                MAX_DEPTH
            );
        }
        Self { siblings, path }
    }

    /// siblings in storage order, root side first.
    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    /// depth is the number of siblings.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// path returns the left/right bitmask.
    pub fn path(&self) -> u64 {
        self.path
    }

    /// root recomputes the tree root implied by this branch for `leaf`.
    pub fn root(&self, leaf: &Hash) -> Hash {
        root_from_branch(&self.siblings, self.depth(), leaf, self.path)
    }

    /// verify reports whether `leaf` is included under the trusted `root`.
    pub fn verify(&self, leaf: &Hash, root: &Hash) -> bool {
        self.root(leaf) == *root
    }
}

/// depth returns the depth of leaf 0 in a tree of `count` leaves, floor(log2(count)).
pub fn depth(count: usize) -> usize {
    if count == 0 {
        panic!("tree depth of an empty leaf sequence");
    }
    (usize::BITS - 1 - count.leading_zeros()) as usize
}

/// root computes the tree hash of a non-empty leaf sequence.
///
/// For three or more leaves, with `cnt` the largest power of two not above the
/// count, the first `2 * cnt - count` leaves are carried up unchanged and the rest
/// are hashed in pairs. The resulting level of `cnt` nodes is then folded pairwise.
pub fn root(leaves: &[Hash]) -> Hash {
    match leaves {
        [] => panic!("tree hash of an empty leaf sequence"),
        [only] => *only,
        [left, right] => fast_hash_pair(left, right),
        _ => {
            let mut level = first_level(leaves);
            while level.len() > 1 {
                level = fold(&level);
            }
            level[0]
        }
    }
}

/// branch returns the inclusion proof of leaf 0, the position of the coinbase
/// transaction in merge mining proofs. Its path is always zero.
pub fn branch(leaves: &[Hash]) -> Branch {
    branch_at(leaves, 0)
}

/// branch_at returns the inclusion proof of the leaf at `index`.
pub fn branch_at(leaves: &[Hash], index: usize) -> Branch {
    if index >= leaves.len() {
        panic!(
            "leaf index out of range: index {}, {} leaves",
            index,
            leaves.len()
        );
    }

    // collected leaf side first, reversed into storage order at the end
    let mut siblings = Vec::with_capacity(depth(leaves.len()) + 1);
    let mut rights = Vec::with_capacity(depth(leaves.len()) + 1);

    let promoted = promoted(leaves.len());
    let mut pos = if index < promoted {
        index
    } else {
        let offset = index - promoted;
        let is_right = offset % 2 == 1;
        siblings.push(leaves[if is_right { index - 1 } else { index + 1 }]);
        rights.push(is_right);
        promoted + offset / 2
    };

    let mut level = first_level(leaves);
    while level.len() > 1 {
        siblings.push(level[pos ^ 1]);
        rights.push(pos & 1 == 1);
        level = fold(&level);
        pos >>= 1;
    }

    siblings.reverse();
    rights.reverse();
    Branch::new(siblings, pack_path(&rights))
}

/// path returns the path bitmask of the leaf at `index` in a tree of `count` leaves,
/// or None when the index is out of range.
pub fn path(count: usize, index: usize) -> Option<u64> {
    if index >= count {
        return None;
    }

    let mut rights = Vec::with_capacity(depth(count) + 1);
    let promoted = promoted(count);
    let mut width = 1usize << depth(count);
    let mut pos = if index < promoted {
        index
    } else {
        let offset = index - promoted;
        rights.push(offset % 2 == 1);
        promoted + offset / 2
    };
    while width > 1 {
        rights.push(pos & 1 == 1);
        width >>= 1;
        pos >>= 1;
    }

    rights.reverse();
    Some(pack_path(&rights))
}

/// root_from_branch rebuilds the root from a leaf and the first `depth` siblings
/// of a branch, walking from level `depth - 1` up to level 0.
pub fn root_from_branch(siblings: &[Hash], depth: usize, leaf: &Hash, path: u64) -> Hash {
    if depth > siblings.len() || depth > MAX_DEPTH {
        panic!(
            "bad branch depth: depth {}, {} siblings",
            depth,
            siblings.len()
        );
    }

    (0..depth).rev().fold(*leaf, |running, d| {
        if path >> d & 1 == 1 {
            fast_hash_pair(&siblings[d], &running)
        } else {
            fast_hash_pair(&running, &siblings[d])
        }
    })
}

// number of leading leaves carried to the first full level without hashing
fn promoted(count: usize) -> usize {
    2 * (1usize << depth(count)) - count
}

fn first_level(leaves: &[Hash]) -> Vec<Hash> {
    let promoted = promoted(leaves.len());
    let mut level = Vec::with_capacity(1 << depth(leaves.len()));
    level.extend_from_slice(&leaves[..promoted]);
    level.extend(
        leaves[promoted..]
            .chunks_exact(2)
            .map(|pair| fast_hash_pair(&pair[0], &pair[1])),
    );
    level
}

fn fold(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks_exact(2)
        .map(|pair| fast_hash_pair(&pair[0], &pair[1]))
        .collect()
}

fn pack_path(rights: &[bool]) -> u64 {
    rights
        .iter()
        .enumerate()
        .fold(0u64, |acc, (d, right)| if *right { acc | 1 << d } else { acc })
}
