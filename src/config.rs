//! Generator options: engine knobs passed to the assembler at construction.

use crate::foundation::error::{TraitstackError, TraitstackResult};
use crate::generate::edition::DEFAULT_MAX_ATTEMPTS;

/// Public gateway prefix used when rewriting image references.
pub const DEFAULT_GATEWAY_URL: &str = "https://ipfs.io/ipfs/";

/// Environment variable overriding [`GeneratorOpts::gateway_url`].
pub const ENV_GATEWAY_URL: &str = "TRAITSTACK_GATEWAY_URL";
/// Environment variable overriding [`GeneratorOpts::max_attempts`].
pub const ENV_MAX_ATTEMPTS: &str = "TRAITSTACK_MAX_ATTEMPTS";
/// Environment variable overriding [`GeneratorOpts::seed`].
pub const ENV_SEED: &str = "TRAITSTACK_SEED";

/// Options controlling a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorOpts {
    /// Rejected draws tolerated per edition before the run fails.
    pub max_attempts: u32,
    /// Gateway prefix joined with the provisional address in final metadata.
    pub gateway_url: String,
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Composite editions on a dedicated rayon pool. Selection stays sequential.
    pub parallel: bool,
    /// Editions selected per parallel compositing chunk.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for GeneratorOpts {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            seed: None,
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

impl GeneratorOpts {
    /// Defaults overlaid with `TRAITSTACK_*` environment variables.
    pub fn from_env() -> TraitstackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TraitstackResult<Self> {
        let mut opts = Self::default();
        if let Some(url) = lookup(ENV_GATEWAY_URL) {
            opts.gateway_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            opts.max_attempts = raw.trim().parse::<u32>().map_err(|e| {
                TraitstackError::configuration(format!("{ENV_MAX_ATTEMPTS}='{raw}': {e}"))
            })?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                TraitstackError::configuration(format!("{ENV_SEED}='{raw}': {e}"))
            })?;
            opts.seed = Some(seed);
        }
        opts.validate()?;
        Ok(opts)
    }

    /// Reject options no run could use.
    pub fn validate(&self) -> TraitstackResult<()> {
        if self.max_attempts == 0 {
            return Err(TraitstackError::configuration("max_attempts must be >= 1"));
        }
        if self.gateway_url.trim().is_empty() {
            return Err(TraitstackError::configuration(
                "gateway_url must be non-empty",
            ));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(TraitstackError::configuration(
                "'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
