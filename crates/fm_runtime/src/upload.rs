//! Upload session progress tracking.

use fm_host::UploadProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identity of one upload action.
pub struct UploadSessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle phase of an upload session.
pub enum UploadPhase {
    /// Bytes are being sent.
    Sending,
    /// Server accepted the batch.
    Completed,
    /// Request failed; the progress indicator is hidden.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One upload action's progress.
pub struct UploadSession {
    /// Identity.
    pub id: UploadSessionId,
    /// Names of the files being sent.
    pub file_names: Vec<String>,
    /// Root-relative destination.
    pub destination: String,
    percent: u8,
    phase: UploadPhase,
}

impl UploadSession {
    /// Starts a session at 0 %.
    pub fn start(id: UploadSessionId, file_names: Vec<String>, destination: String) -> Self {
        Self {
            id,
            file_names,
            destination,
            percent: 0,
            phase: UploadPhase::Sending,
        }
    }

    /// Current percentage.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Current phase.
    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Returns `true` while the progress indicator should be shown.
    pub fn shows_progress(&self) -> bool {
        self.phase != UploadPhase::Failed
    }

    /// Applies a transport progress event. The percentage never decreases, and events without a
    /// computable total or arriving after completion are ignored.
    pub fn record(&mut self, progress: UploadProgress) {
        if self.phase != UploadPhase::Sending {
            return;
        }
        if let Some(percent) = progress.percent() {
            self.percent = self.percent.max(percent);
        }
    }

    /// Marks the batch as accepted at 100 %.
    pub fn complete(&mut self) {
        self.phase = UploadPhase::Completed;
        self.percent = 100;
    }

    /// Marks the batch as failed.
    pub fn fail(&mut self) {
        self.phase = UploadPhase::Failed;
    }
}
