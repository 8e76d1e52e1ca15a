use rand::Rng;

use crate::assets::cache::AssetCache;
use crate::collection::model::{CollectionConfig, Layer};
use crate::collection::selection::Selection;
use crate::compose::compositor::Compositor;
use crate::foundation::error::{CollisionCause, TraitstackError, TraitstackResult};
use crate::generate::sampler::pick;
use crate::generate::validator::{Rejection, SeenCombinations, check};
use crate::metadata::{EditionMetadata, image_path};

/// Default bound on rejected draws per edition.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Per-edition accounting of rejected draws.
///
/// The budget is exhausted once the number of failures exceeds `max_attempts`, so an edition may
/// draw up to `max_attempts + 1` rejected candidates before giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    duplicates: u32,
    exclusions: u32,
    failures: u32,
}

impl RetryBudget {
    /// Fresh budget for one edition.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            duplicates: 0,
            exclusions: 0,
            failures: 0,
        }
    }

    /// Record a rejected draw. Returns `true` when the budget is now exhausted.
    pub fn record(&mut self, rejection: Rejection) -> bool {
        self.failures = self.failures.saturating_add(1);
        if rejection.duplicate {
            self.duplicates = self.duplicates.saturating_add(1);
        }
        if rejection.excluded {
            self.exclusions = self.exclusions.saturating_add(1);
        }
        self.failures > self.max_attempts
    }

    /// Rejected draws so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Dominant blocking condition. Ties favor uniqueness.
    pub fn cause(&self) -> CollisionCause {
        if self.exclusions > self.duplicates {
            CollisionCause::ExclusionsTooRestrictive
        } else {
            CollisionCause::UniqueSpaceExhausted
        }
    }
}

enum AttemptState {
    Sampling,
    Checking(Selection),
    Accepted(Selection),
    Retry(Rejection),
    Fatal,
}

/// Output of phase 1 for one edition: accepted selection, composited image, provisional metadata.
#[derive(Clone, Debug)]
pub struct EditionRecord {
    /// 1-based edition index.
    pub edition: u32,
    /// Accepted variant selection.
    pub selection: Selection,
    /// Archive-relative image path.
    pub image_path: String,
    /// Encoded image bytes.
    pub image: Vec<u8>,
    /// Metadata with the archive-relative image placeholder.
    pub metadata: EditionMetadata,
}

/// Draws and validates selections for one collection, one edition at a time.
pub struct EditionGenerator<'a> {
    stack: Vec<&'a Layer>,
    max_attempts: u32,
}

impl<'a> EditionGenerator<'a> {
    /// Generator over `config`'s layers in render order.
    pub fn new(config: &'a CollectionConfig, max_attempts: u32) -> Self {
        Self {
            stack: config.layer_stack(),
            max_attempts,
        }
    }

    /// Layers in render order.
    pub fn stack(&self) -> &[&'a Layer] {
        &self.stack
    }

    /// Draw one candidate: an independent weighted pick per layer.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TraitstackResult<Selection> {
        let mut picks = Vec::with_capacity(self.stack.len());
        for layer in &self.stack {
            picks.push(pick(layer, rng)?);
        }
        Selection::from_indices(&self.stack, picks)
    }

    /// Find an acceptable selection for `edition` and record its key in `seen`.
    ///
    /// Fails with [`TraitstackError::CollisionLimitExceeded`] once the retry budget is exhausted.
    /// A successful call draws from `rng` until acceptance; the same seed and the same `seen` set
    /// yield the same selection.
    pub fn select<R: Rng + ?Sized>(
        &self,
        edition: u32,
        rng: &mut R,
        seen: &mut SeenCombinations,
    ) -> TraitstackResult<Selection> {
        let mut budget = RetryBudget::new(self.max_attempts);
        let mut state = AttemptState::Sampling;
        loop {
            state = match state {
                AttemptState::Sampling => AttemptState::Checking(self.sample(rng)?),
                AttemptState::Checking(selection) => match check(&selection, &self.stack, seen) {
                    Ok(()) => AttemptState::Accepted(selection),
                    Err(rejection) => AttemptState::Retry(rejection),
                },
                AttemptState::Retry(rejection) => {
                    if budget.record(rejection) {
                        AttemptState::Fatal
                    } else {
                        AttemptState::Sampling
                    }
                }
                AttemptState::Accepted(selection) => {
                    seen.insert(selection.key().clone());
                    tracing::debug!(
                        edition,
                        rejected = budget.failures(),
                        key = %selection.key(),
                        "edition accepted"
                    );
                    return Ok(selection);
                }
                AttemptState::Fatal => {
                    let cause = budget.cause();
                    tracing::warn!(
                        edition,
                        attempts = budget.failures(),
                        %cause,
                        "retry budget exhausted"
                    );
                    return Err(TraitstackError::CollisionLimitExceeded {
                        edition,
                        attempts: budget.failures(),
                        cause,
                    });
                }
            };
        }
    }

    /// Composite the accepted `selection` and build its provisional metadata.
    pub fn compose(
        &self,
        edition: u32,
        selection: Selection,
        cache: &AssetCache,
        compositor: &dyn Compositor,
        config: &CollectionConfig,
    ) -> TraitstackResult<EditionRecord> {
        let mut planes = Vec::with_capacity(self.stack.len());
        for (_, variant) in selection.resolve(&self.stack) {
            planes.push(cache.get(&variant.asset_id)?);
        }
        let image = compositor
            .composite(&planes)
            .map_err(|e| TraitstackError::composite(edition, e))?;

        let image_path = image_path(edition, compositor.extension());
        let metadata = EditionMetadata::provisional(
            config,
            &self.stack,
            &selection,
            edition,
            image_path.clone(),
        );
        Ok(EditionRecord {
            edition,
            selection,
            image_path,
            image,
            metadata,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/edition.rs"]
mod tests;
