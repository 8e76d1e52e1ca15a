use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::archive::CollectionArchive;
use crate::assets::cache::AssetCache;
use crate::assets::source::AssetSource;
use crate::collection::model::CollectionConfig;
use crate::compose::compositor::Compositor;
use crate::config::GeneratorOpts;
use crate::foundation::core::ContentAddress;
use crate::foundation::error::{PublishPhase, TraitstackError, TraitstackResult};
use crate::generate::edition::{EditionGenerator, EditionRecord};
use crate::generate::validator::SeenCombinations;
use crate::publish::store::Publisher;
use crate::session::status::{GenerationStatus, StatusSink};

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionOutput {
    /// Address of the final archive, whose metadata points at `provisional_address`.
    pub final_address: ContentAddress,
    /// Address of the first upload, used as the image base in final metadata.
    pub provisional_address: ContentAddress,
    /// Number of editions in the archive.
    pub editions: u32,
    /// Final archive bytes (ZIP).
    pub archive: Vec<u8>,
}

/// Result of [`CollectionAssembler::run`].
pub type GenerationResult = TraitstackResult<CollectionOutput>;

/// Runs a collection end to end: pre-warm, editions `1..=N`, two-phase publish.
///
/// Selection always happens on the calling thread in edition order. With `parallel` set, each
/// chunk of accepted selections is composited on a dedicated rayon pool and appended to the
/// archive in index order, so parallel and sequential runs with the same seed produce identical
/// archives.
pub struct CollectionAssembler<'a> {
    opts: GeneratorOpts,
    source: &'a dyn AssetSource,
    compositor: &'a dyn Compositor,
    publisher: &'a dyn Publisher,
}

impl<'a> CollectionAssembler<'a> {
    /// Construct an assembler. Fails on invalid options.
    pub fn new(
        opts: GeneratorOpts,
        source: &'a dyn AssetSource,
        compositor: &'a dyn Compositor,
        publisher: &'a dyn Publisher,
    ) -> TraitstackResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            source,
            compositor,
            publisher,
        })
    }

    /// Options this assembler runs with.
    pub fn opts(&self) -> &GeneratorOpts {
        &self.opts
    }

    /// Generate and publish `config` with an empty uniqueness set.
    pub fn run(&self, config: &CollectionConfig, status: &mut dyn StatusSink) -> GenerationResult {
        self.run_with_seen(config, SeenCombinations::new(), status)
    }

    /// Generate and publish `config`, treating every key in `seen` as already taken.
    ///
    /// Emits Pending, then Generating after each edition, then Publishing, then Complete. Any
    /// error emits Failed and aborts the run; no partial archive is returned.
    #[tracing::instrument(skip_all, fields(collection = %config.id, editions = config.edition_count))]
    pub fn run_with_seen(
        &self,
        config: &CollectionConfig,
        mut seen: SeenCombinations,
        status: &mut dyn StatusSink,
    ) -> GenerationResult {
        let total = config.edition_count;
        status.update(&GenerationStatus::pending(total));

        let mut done = 0u32;
        let res = self.generate_and_publish(config, &mut seen, status, &mut done);
        match &res {
            Ok(out) => {
                tracing::info!(final_address = %out.final_address, "collection published");
                status.update(&GenerationStatus::complete(total, out.final_address.as_str()));
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), edition = ?e.edition(), "run failed: {e}");
                status.update(&GenerationStatus::failed(done, total, e));
            }
        }
        res
    }

    fn generate_and_publish(
        &self,
        config: &CollectionConfig,
        seen: &mut SeenCombinations,
        status: &mut dyn StatusSink,
        done: &mut u32,
    ) -> GenerationResult {
        config.validate()?;
        let total = config.edition_count;

        let pool = build_thread_pool(self.opts.threads)?;
        let cache = pool.install(|| AssetCache::prewarm(&config.layers, self.source))?;

        let mut rng = match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let generator = EditionGenerator::new(config, self.opts.max_attempts);
        let mut archive = CollectionArchive::new();
        status.update(&GenerationStatus::generating(0, total));

        if self.opts.parallel {
            let editions: Vec<u32> = (1..=total).collect();
            let compositor = self.compositor;
            for chunk in editions.chunks(self.opts.chunk_size.max(1)) {
                let mut picked = Vec::with_capacity(chunk.len());
                for &edition in chunk {
                    picked.push((edition, generator.select(edition, &mut rng, seen)?));
                }
                let records: Vec<TraitstackResult<EditionRecord>> = pool.install(|| {
                    picked
                        .into_par_iter()
                        .map(|(edition, selection)| {
                            generator.compose(edition, selection, &cache, compositor, config)
                        })
                        .collect()
                });
                for record in records {
                    archive.push(record?)?;
                    *done += 1;
                    status.update(&GenerationStatus::generating(*done, total));
                }
            }
        } else {
            for edition in 1..=total {
                let selection = generator.select(edition, &mut rng, seen)?;
                let record =
                    generator.compose(edition, selection, &cache, self.compositor, config)?;
                archive.push(record)?;
                *done += 1;
                status.update(&GenerationStatus::generating(*done, total));
            }
        }

        status.update(&GenerationStatus::publishing(total));
        let provisional_bytes = archive.to_zip_bytes()?;
        let provisional_address = self
            .publisher
            .publish(&config.id, &provisional_bytes)
            .map_err(publish_error(PublishPhase::Provisional))?;
        tracing::info!(
            address = %provisional_address,
            bytes = provisional_bytes.len(),
            "provisional archive published"
        );

        archive.rewrite_images(&provisional_address, &self.opts.gateway_url);
        let final_bytes = archive.to_zip_bytes()?;
        let final_address = self
            .publisher
            .publish(&config.id, &final_bytes)
            .map_err(publish_error(PublishPhase::Final))?;

        Ok(CollectionOutput {
            final_address,
            provisional_address,
            editions: total,
            archive: final_bytes,
        })
    }
}

fn publish_error(phase: PublishPhase) -> impl Fn(TraitstackError) -> TraitstackError {
    move |e| match e {
        TraitstackError::Publish { .. } => e,
        other => TraitstackError::publish(phase, other),
    }
}

fn build_thread_pool(threads: Option<usize>) -> TraitstackResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TraitstackError::configuration(
            "'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        TraitstackError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/assembler.rs"]
mod tests;
