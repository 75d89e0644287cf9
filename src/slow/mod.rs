use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::hash::Hash;

mod cn;
mod config;
mod heavy;
mod mixer;
mod random_math;
mod scratchpad;

pub use cn::RANDOM_MATH_VARIANT;
pub use config::{
    SlowHashConfig, CN_ITERATIONS, CN_MEMORY, HEAVY_ITERATIONS, HEAVY_MEMORY, MIN_MEMORY,
};
pub use scratchpad::STATE_SIZE;

/// HashVariant selects the algorithm family of a slow hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashVariant {
    /// heavy hash without tweaks
    HeavyV1,
    /// heavy hash with the store tweak
    HeavyV2,
    /// heavy hash with tweak, shuffle and integer math
    HeavyV3,
    /// the cn family, parameterized by variant number and height
    #[default]
    CnR,
}

impl HashVariant {
    /// name is the configuration name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            HashVariant::HeavyV1 => "heavy_v1",
            HashVariant::HeavyV2 => "heavy_v2",
            HashVariant::HeavyV3 => "heavy_v3",
            HashVariant::CnR => "cn_r",
        }
    }
}

impl fmt::Display for HashVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "heavy_v1" => HashVariant::HeavyV1,
            "heavy_v2" => HashVariant::HeavyV2,
            "heavy_v3" => HashVariant::HeavyV3,
            "cn_r" => HashVariant::CnR,
            _ => bail!("unknown slow hash variant: {}", s),
        })
    }
}

/// SlowHashContext owns the scratch state of one execution context, typically one
/// worker thread, and dispatches slow hash requests to the matching engine.
///
/// Both scratchpads are allocated once, when the context is built, and reused by
/// every later call. A context is `Send` but is used through `&mut self`, so it is
/// never shared between two workers at once; give each worker its own.
pub struct SlowHashContext {
    heavy: heavy::HeavyState,
    cn: cn::CnState,
    allocations: usize,
}

impl SlowHashContext {
    /// new builds a context with the network profile.
    pub fn new() -> Result<Self> {
        Self::with_config(SlowHashConfig::default())
    }

    /// with_config builds a context with a custom profile. An invalid profile or a
    /// failed scratchpad allocation is returned as an error.
    pub fn with_config(config: SlowHashConfig) -> Result<Self> {
        config.validate()?;

        let heavy = heavy::HeavyState::new(config.heavy_memory, config.heavy_iterations)?;
        let cn = cn::CnState::new(config.cn_memory, config.cn_iterations)?;
        debug!(
            heavy_memory = config.heavy_memory,
            heavy_iterations = config.heavy_iterations,
            cn_memory = config.cn_memory,
            cn_iterations = config.cn_iterations,
            "allocated slow hash scratchpads"
        );

        Ok(Self {
            heavy,
            cn,
            allocations: 2,
        })
    }

    /// allocations returns how many scratchpads this context has allocated.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// hash computes the slow hash of `data` with variant number 0 at height 0.
    pub fn hash(&mut self, data: &[u8], variant: HashVariant) -> Hash {
        self.hash_with_params(data, variant, 0, 0)
    }

    /// hash_with_params computes the slow hash of `data`. `cn_variant` and `height`
    /// are only read by the cn family; the heavy variants ignore them.
    pub fn hash_with_params(
        &mut self,
        data: &[u8],
        variant: HashVariant,
        cn_variant: u32,
        height: u64,
    ) -> Hash {
        match variant {
            HashVariant::HeavyV1 => heavy::v1(&mut self.heavy, data),
            HashVariant::HeavyV2 => heavy::v2(&mut self.heavy, data),
            HashVariant::HeavyV3 => heavy::v3(&mut self.heavy, data),
            HashVariant::CnR => cn::hash(&mut self.cn, data, cn_variant, false, height),
        }
    }
}

impl fmt::Debug for SlowHashContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlowHashContext")
            .field("allocations", &self.allocations)
            .finish_non_exhaustive()
    }
}
