//! Download tally.

/// Outcome counters for one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Beatmapsets the producer announced. Replaced by the number actually
    /// enqueued once the queue closes.
    pub expected: u64,
    pub downloaded: u64,
    /// IDs that could not be fetched, in the order they failed.
    pub failed: Vec<u64>,
}

impl DownloadSummary {
    pub fn new(expected: u64) -> Self {
        Self {
            expected,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.downloaded += 1;
    }

    pub fn record_failure(&mut self, beatmapset_id: u64) {
        self.failed.push(beatmapset_id);
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.len() as u64
    }

    /// Items attempted so far.
    pub fn processed(&self) -> u64 {
        self.downloaded + self.failed_count()
    }

    /// Denominator for progress and the final summary.
    ///
    /// Grows past `expected` if the producer sent more than announced.
    pub fn total(&self) -> u64 {
        self.expected.max(self.processed())
    }

    pub fn is_complete(&self) -> bool {
        self.processed() >= self.expected
    }
}
