use crate::foundation::error::TraitstackError;

/// Lifecycle of a generation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Accepted but not started.
    Pending,
    /// Producing editions.
    Generating,
    /// Uploading the archive.
    Publishing,
    /// Final address available.
    Complete,
    /// Stopped with an error.
    Failed,
}

/// Snapshot of a job's progress, pushed to a [`StatusSink`] on every transition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    /// Current lifecycle state.
    #[serde(rename = "status")]
    pub state: JobState,
    /// Completed share of the editions, 0..=100.
    pub progress_percent: u8,
    /// Last completed edition index (0 before the first).
    pub current_image: u32,
    /// Editions requested.
    pub total_images: u32,
    /// Final content address, once complete.
    #[serde(rename = "finalDownloadCID", skip_serializing_if = "Option::is_none")]
    pub final_address: Option<String>,
    /// Failure description, once failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl GenerationStatus {
    /// Job accepted, nothing done yet.
    pub fn pending(total: u32) -> Self {
        Self {
            state: JobState::Pending,
            progress_percent: 0,
            current_image: 0,
            total_images: total,
            final_address: None,
            error_message: None,
        }
    }

    /// `current` of `total` editions done.
    pub fn generating(current: u32, total: u32) -> Self {
        Self {
            state: JobState::Generating,
            progress_percent: percent(current, total),
            current_image: current,
            ..Self::pending(total)
        }
    }

    /// All editions done; uploading.
    pub fn publishing(total: u32) -> Self {
        Self {
            state: JobState::Publishing,
            progress_percent: 100,
            current_image: total,
            ..Self::pending(total)
        }
    }

    /// Run finished with `final_address`.
    pub fn complete(total: u32, final_address: impl Into<String>) -> Self {
        Self {
            state: JobState::Complete,
            final_address: Some(final_address.into()),
            ..Self::publishing(total)
        }
    }

    /// Run stopped at `current` editions with `error`.
    pub fn failed(current: u32, total: u32, error: &TraitstackError) -> Self {
        Self {
            state: JobState::Failed,
            progress_percent: percent(current, total),
            current_image: current,
            error_message: Some(format!("{}: {error}", error.kind())),
            ..Self::pending(total)
        }
    }
}

fn percent(current: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let p = u64::from(current.min(total)) * 100 / u64::from(total);
    p as u8
}

/// Receives status transitions in the order they happen.
pub trait StatusSink {
    /// Called on every transition and after every completed edition.
    fn update(&mut self, status: &GenerationStatus);
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStatus;

impl StatusSink for NoopStatus {
    fn update(&mut self, _status: &GenerationStatus) {}
}

/// Keeps every update, for tests and debugging.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStatus {
    history: Vec<GenerationStatus>,
}

impl InMemoryStatus {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates in arrival order.
    pub fn history(&self) -> &[GenerationStatus] {
        &self.history
    }

    /// Most recent update.
    pub fn last(&self) -> Option<&GenerationStatus> {
        self.history.last()
    }

    /// Distinct states in arrival order, with consecutive repeats collapsed.
    pub fn states(&self) -> Vec<JobState> {
        let mut out: Vec<JobState> = Vec::new();
        for s in &self.history {
            if out.last() != Some(&s.state) {
                out.push(s.state);
            }
        }
        out
    }
}

impl StatusSink for InMemoryStatus {
    fn update(&mut self, status: &GenerationStatus) {
        self.history.push(status.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/status.rs"]
mod tests;
