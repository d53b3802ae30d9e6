//! Conversational store-creation wizard.
//!
//! The wizard walks a user through an ordered, lightly-branching set of
//! steps (type → category → name → subdomain → description → images →
//! contact → location → hours → theme → review → submit), accumulating a
//! [`draft::StoreDraft`] and an append-only [`transcript::Transcript`].
//! The flow contract lives here; rendering is the view layer's job.

pub mod draft;
pub mod orchestrator;
pub mod prompts;
pub mod session;
pub mod step;
pub mod transcript;
pub mod validators;

pub use draft::{HoursForm, LocationForm, StoreDraft, StoreType, Weekday};
pub use orchestrator::WizardOrchestrator;
pub use session::WizardSession;
pub use step::{ImageField, InputModality, Step, StepEvent, Transition};
pub use transcript::{Message, Speaker, Transcript, Widget};
