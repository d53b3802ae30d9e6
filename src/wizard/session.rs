//! Wizard session state — the owned, explicit state bag for one run.

use crate::api::{Category, ThemeTemplate};
use crate::error::FieldError;
use crate::wizard::draft::{StoreDraft, StoreType};
use crate::wizard::step::{InputModality, Step};
use crate::wizard::transcript::Transcript;

/// All mutable state for one wizard run.
///
/// Created empty at mount and reset on restart; nothing here survives the
/// session — persistence is delegated to the creation call. Only the
/// orchestrator writes; the view layer reads and forwards events.
#[derive(Debug)]
pub struct WizardSession {
    /// The accumulating store record.
    pub draft: StoreDraft,
    /// Append-only conversation log.
    pub transcript: Transcript,
    /// Current position in the flow.
    pub step: Step,
    /// Input shape the view should expose for the current step.
    pub modality: InputModality,
    /// Store type handed in by the caller, if any. Decides the entry branch
    /// and is reused on restart.
    pub pre_selected: Option<StoreType>,
    /// Free-text input is disabled (widget step, or a submission in flight).
    pub input_disabled: bool,
    /// View hint: move focus to the free-text input.
    pub focus_input: bool,
    /// A submission is being processed (covers the simulated typing delay).
    pub busy: bool,
    /// An image upload is in flight.
    pub uploading: bool,
    /// The creation call is in flight.
    pub submitting: bool,
    /// Field-scoped validation or upload error for the current step.
    pub field_error: Option<FieldError>,
    /// Standalone error string for creation failures.
    pub error: Option<String>,
    /// Categories loaded for the category selector.
    pub categories: Vec<Category>,
    /// Themes loaded for the theme selector.
    pub themes: Vec<ThemeTemplate>,
    /// Set once the post-creation redirect fires; the view navigates here.
    pub redirect_to: Option<String>,
    /// Bumped on every restart. Async results carrying an older generation
    /// are stale and must be dropped.
    generation: u64,
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            draft: StoreDraft::default(),
            transcript: Transcript::new(),
            step: Step::initial(false),
            modality: Step::initial(false).modality(),
            pre_selected: None,
            input_disabled: true,
            focus_input: false,
            busy: false,
            uploading: false,
            submitting: false,
            field_error: None,
            error: None,
            categories: Vec::new(),
            themes: Vec::new(),
            redirect_to: None,
            generation: 0,
        }
    }

    /// The current session generation, captured before a suspension point
    /// and compared after it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate all in-flight async results. Restart only.
    pub(crate) fn bump_generation(&mut self) {
        self.generation += 1;
    }

    /// Whether any action is currently being processed.
    pub fn in_flight(&self) -> bool {
        self.busy || self.uploading || self.submitting
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_empty_and_idle() {
        let s = WizardSession::new();
        assert!(s.transcript.is_empty());
        assert!(s.draft.store_name.is_none());
        assert!(!s.in_flight());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn generation_only_moves_forward() {
        let mut s = WizardSession::new();
        s.bump_generation();
        s.bump_generation();
        assert_eq!(s.generation(), 2);
    }
}
