//! Random path generation with retry.
//!
//! Each attempt draws, uniformly: a start cluster, a start node inside it,
//! and a target cluster.  The decoded path is kept if it passes the
//! [`PathFilter`]; otherwise a fresh triple is drawn, up to `max_attempts`
//! times.
//!
//! Batches seed one RNG per path from `(seed, path index)`, so a batch is
//! identical whether it runs sequentially or (feature `parallel`) on Rayon's
//! thread pool, and a larger batch extends a smaller one.

use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use plg_core::{ClusterId, DecodeConfig, PlgRng};
use plg_model::Plg;

use crate::decoder::{ArgMaxLowestIndex, NextNodePolicy, PathDecoder};
use crate::{DecodeError, DecodeResult, GeneratedPath, PathFilter};

/// Draws and decodes random (start, target) pairs until a path is viable.
pub struct PathGenerator<'a, P = ArgMaxLowestIndex> {
    decoder:      PathDecoder<'a, P>,
    filter:       PathFilter,
    max_attempts: usize,
    start_ids:    Vec<ClusterId>,
    target_ids:   Vec<ClusterId>,
}

impl<'a> PathGenerator<'a, ArgMaxLowestIndex> {
    pub fn new(plg: &'a Plg, config: &DecodeConfig) -> DecodeResult<Self> {
        Self::with_decoder(PathDecoder::new(plg, config)?, config)
    }
}

impl<'a, P: NextNodePolicy> PathGenerator<'a, P> {
    pub fn with_decoder(decoder: PathDecoder<'a, P>, config: &DecodeConfig) -> DecodeResult<Self> {
        let plg = decoder.plg();
        let start_ids: Vec<ClusterId> = plg.start_clusters.ids().collect();
        let target_ids: Vec<ClusterId> = plg.target_clusters.ids().collect();
        if start_ids.is_empty() || target_ids.is_empty() {
            return Err(DecodeError::NoClusters);
        }
        Ok(Self {
            decoder,
            filter: PathFilter::new(config),
            max_attempts: config.max_attempts,
            start_ids,
            target_ids,
        })
    }

    pub fn decoder(&self) -> &PathDecoder<'a, P> {
        &self.decoder
    }

    /// One viable path, drawing from `rng`.
    pub fn generate(&self, rng: &mut PlgRng) -> DecodeResult<GeneratedPath> {
        let plg = self.decoder.plg();
        for attempt in 1..=self.max_attempts {
            let Some(&start_cluster) = rng.choose(&self.start_ids) else { break };
            let members = plg.start_clusters.members(start_cluster).unwrap_or(&[]);
            let Some(&start) = rng.choose(members) else { continue };
            let Some(&target) = rng.choose(&self.target_ids) else { break };

            let path = self.decoder.decode(start, target)?;
            if self.filter.accepts(&path) {
                debug!(attempt, start = start.0, target = target.0, len = path.len(), "path accepted");
                return Ok(path);
            }
            debug!(attempt, len = path.len(), end = ?path.end, "path rejected");
        }
        warn!(attempts = self.max_attempts, "no viable path found");
        Err(DecodeError::AttemptsExhausted { attempts: self.max_attempts })
    }

    /// Path number `index` of the batch seeded by `seed`.
    pub fn generate_nth(&self, seed: u64, index: u64) -> DecodeResult<GeneratedPath> {
        self.generate(&mut PlgRng::for_path(seed, index))
    }

    /// `count` independent paths.  Fails on the first path that exhausts its
    /// attempts.
    pub fn generate_batch(&self, count: usize, seed: u64) -> DecodeResult<Vec<GeneratedPath>> {
        #[cfg(feature = "parallel")]
        let paths: DecodeResult<Vec<GeneratedPath>> =
            (0..count as u64).into_par_iter().map(|i| self.generate_nth(seed, i)).collect();
        #[cfg(not(feature = "parallel"))]
        let paths: DecodeResult<Vec<GeneratedPath>> =
            (0..count as u64).map(|i| self.generate_nth(seed, i)).collect();

        let paths = paths?;
        info!(count = paths.len(), seed, "path batch generated");
        Ok(paths)
    }
}
