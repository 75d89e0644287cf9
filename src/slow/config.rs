use anyhow::{ensure, Result};

/// Scratchpad size in bytes of the heavy variants.
pub const HEAVY_MEMORY: usize = 4 * 1024 * 1024;

/// Memory-hard loop iterations of the heavy variants.
pub const HEAVY_ITERATIONS: usize = 0x40000;

/// Scratchpad size in bytes of the cn family.
pub const CN_MEMORY: usize = 2 * 1024 * 1024;

/// Memory-hard loop iterations of the cn family.
pub const CN_ITERATIONS: usize = 0x80000;

/// Smallest scratchpad accepted: one explode chunk of eight 16 byte lines.
pub const MIN_MEMORY: usize = 128;

/// SlowHashConfig sizes the scratchpads and loops of a context.
///
/// The default is the network profile. Smaller profiles hash much faster and are
/// meant for tests and benchmarks; their digests differ from the network ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlowHashConfig {
    /// heavy scratchpad size in bytes
    pub heavy_memory: usize,
    /// heavy loop iterations
    pub heavy_iterations: usize,
    /// cn scratchpad size in bytes
    pub cn_memory: usize,
    /// cn loop iterations
    pub cn_iterations: usize,
}

impl Default for SlowHashConfig {
    fn default() -> Self {
        Self {
            heavy_memory: HEAVY_MEMORY,
            heavy_iterations: HEAVY_ITERATIONS,
            cn_memory: CN_MEMORY,
            cn_iterations: CN_ITERATIONS,
        }
    }
}

impl SlowHashConfig {
    /// validate checks that both scratchpads are powers of two of at least
    /// MIN_MEMORY bytes and that both loops run at least once.
    pub fn validate(&self) -> Result<()> {
        check_memory("heavy", self.heavy_memory)?;
        check_memory("cn", self.cn_memory)?;
        ensure!(self.heavy_iterations > 0, "heavy iterations must be non-zero");
        ensure!(self.cn_iterations > 0, "cn iterations must be non-zero");
        Ok(())
    }
}

fn check_memory(name: &str, bytes: usize) -> Result<()> {
    ensure!(
        bytes >= MIN_MEMORY && bytes.is_power_of_two(),
        "{} scratchpad must be a power of two of at least {} bytes, got {}",
        name,
        MIN_MEMORY,
        bytes
    );
    Ok(())
}
