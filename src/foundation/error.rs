use std::fmt;

/// Convenience result type used across traitstack.
pub type TraitstackResult<T> = Result<T, TraitstackError>;

/// Why an edition could not find an acceptable combination within its retry budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionCause {
    /// Most rejected draws were combinations already accepted earlier in the run.
    UniqueSpaceExhausted,
    /// Most rejected draws violated a declared exclusion rule.
    ExclusionsTooRestrictive,
}

impl fmt::Display for CollisionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniqueSpaceExhausted => f.write_str("no unique combinations available"),
            Self::ExclusionsTooRestrictive => f.write_str("exclusion rules too restrictive"),
        }
    }
}

/// Which upload of the two-phase publish failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishPhase {
    /// First upload, metadata still carries placeholder image references.
    Provisional,
    /// Second upload, metadata rewritten against the provisional address.
    Final,
}

impl fmt::Display for PublishPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provisional => f.write_str("provisional"),
            Self::Final => f.write_str("final"),
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal to a run. Nothing is retried inside the engine.
#[derive(thiserror::Error, Debug)]
pub enum TraitstackError {
    /// Invalid collection configuration or generator options.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A referenced trait asset could not be fetched during pre-warm.
    #[error("asset fetch error: '{asset_id}': {reason}")]
    AssetFetch {
        /// Asset identifier as written in the variant.
        asset_id: String,
        /// Underlying failure description.
        reason: String,
    },

    /// The per-edition retry bound was exhausted.
    #[error(
        "collision limit exceeded at edition {edition} after {attempts} rejected draws: {cause}; \
         reduce the collection size or adjust trait/exclusion rules"
    )]
    CollisionLimitExceeded {
        /// 1-based edition index being generated.
        edition: u32,
        /// Number of rejected draws for that edition.
        attempts: u32,
        /// Dominant blocking condition.
        cause: CollisionCause,
    },

    /// The image compositor failed for an accepted selection.
    #[error("composite error at edition {edition}: {reason}")]
    Composite {
        /// 1-based edition index being composited.
        edition: u32,
        /// Underlying failure description.
        reason: String,
    },

    /// Uploading the archive failed.
    #[error("publish error ({phase} upload): {reason}")]
    Publish {
        /// Which upload failed.
        phase: PublishPhase,
        /// Underlying failure description.
        reason: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TraitstackError {
    /// Build a [`TraitstackError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`TraitstackError::AssetFetch`] value.
    pub fn asset_fetch(asset_id: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::AssetFetch {
            asset_id: asset_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`TraitstackError::Composite`] value.
    pub fn composite(edition: u32, reason: impl fmt::Display) -> Self {
        Self::Composite {
            edition,
            reason: reason.to_string(),
        }
    }

    /// Build a [`TraitstackError::Publish`] value.
    pub fn publish(phase: PublishPhase, reason: impl fmt::Display) -> Self {
        Self::Publish {
            phase,
            reason: reason.to_string(),
        }
    }

    /// Build a [`TraitstackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Edition index at which the run failed, when the failure is tied to one.
    pub fn edition(&self) -> Option<u32> {
        match self {
            Self::CollisionLimitExceeded { edition, .. } | Self::Composite { edition, .. } => {
                Some(*edition)
            }
            _ => None,
        }
    }

    /// Short machine-readable kind, stable for status reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::AssetFetch { .. } => "AssetFetchError",
            Self::CollisionLimitExceeded { .. } => "CollisionLimitExceeded",
            Self::Composite { .. } => "CompositeError",
            Self::Publish { .. } => "PublishError",
            Self::Serde(_) => "SerializationError",
            Self::Other(_) => "InternalError",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
