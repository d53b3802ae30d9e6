//! Step state machine — the ordered, lightly-branching step graph.
//!
//! Every step declares exactly one accepted input modality and exactly one
//! deterministic successor per valid event. Three decision points carry two
//! successors: initial type confirmation, subdomain confirmation, and each
//! optional image step (where skip and successful upload share the same
//! successor — skip only leaves the draft field unset).

use serde::{Deserialize, Serialize};

use crate::error::StepError;
use crate::wizard::draft::{HoursForm, LocationForm, StoreDraft, StoreType};
use crate::wizard::prompts;

/// A position in the conversational flow.
///
/// Two entry branches exist: `SelectType` when no store type was
/// pre-selected by the caller, `ConfirmType` when one was. They converge at
/// `StoreCategory`. Terminal step: `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    SelectType,
    ConfirmType,
    StoreCategory,
    StoreName,
    ConfirmSubdomain,
    EditSubdomain,
    StoreDescription,
    StoreLogo,
    StoreCover,
    StoreHeroImage,
    StoreHeroHeadline,
    StoreHeroTagline,
    StoreEmail,
    StorePhone,
    StoreLocation,
    StoreHours,
    StoreTheme,
    Review,
    Complete,
}

impl Step {
    /// Entry step for a new session.
    pub fn initial(pre_selected: bool) -> Step {
        if pre_selected {
            Step::ConfirmType
        } else {
            Step::SelectType
        }
    }

    /// Whether this step ends the conversation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Complete)
    }

    /// The one input modality this step accepts.
    pub fn modality(&self) -> InputModality {
        match self {
            Step::SelectType => InputModality::Selector(SelectorKind::StoreType),
            Step::ConfirmType => InputModality::Selector(SelectorKind::TypeConfirm),
            Step::StoreCategory => InputModality::Selector(SelectorKind::Category),
            Step::StoreName => InputModality::FreeText(ValidatorKind::NonEmpty),
            Step::ConfirmSubdomain => InputModality::Selector(SelectorKind::SubdomainConfirm),
            Step::EditSubdomain => InputModality::FreeText(ValidatorKind::NonEmpty),
            Step::StoreDescription => InputModality::FreeText(ValidatorKind::NonEmpty),
            Step::StoreLogo => InputModality::Form(FormKind::ImageUpload(ImageField::Logo)),
            Step::StoreCover => InputModality::Form(FormKind::ImageUpload(ImageField::Cover)),
            Step::StoreHeroImage => {
                InputModality::Form(FormKind::ImageUpload(ImageField::HeroImage))
            }
            Step::StoreHeroHeadline => InputModality::FreeText(ValidatorKind::NonEmpty),
            Step::StoreHeroTagline => InputModality::FreeText(ValidatorKind::NonEmpty),
            Step::StoreEmail => InputModality::FreeText(ValidatorKind::Email),
            Step::StorePhone => InputModality::FreeText(ValidatorKind::Phone),
            Step::StoreLocation => InputModality::Form(FormKind::Location),
            Step::StoreHours => InputModality::Form(FormKind::Hours),
            Step::StoreTheme => InputModality::Selector(SelectorKind::Theme),
            Step::Review => InputModality::Selector(SelectorKind::ReviewActions),
            Step::Complete => InputModality::None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SelectType => "select-type",
            Self::ConfirmType => "confirm-type",
            Self::StoreCategory => "store-category",
            Self::StoreName => "store-name",
            Self::ConfirmSubdomain => "confirm-subdomain",
            Self::EditSubdomain => "edit-subdomain",
            Self::StoreDescription => "store-description",
            Self::StoreLogo => "store-logo",
            Self::StoreCover => "store-cover",
            Self::StoreHeroImage => "store-hero-image",
            Self::StoreHeroHeadline => "store-hero-headline",
            Self::StoreHeroTagline => "store-hero-tagline",
            Self::StoreEmail => "store-email",
            Self::StorePhone => "store-phone",
            Self::StoreLocation => "store-location",
            Self::StoreHours => "store-hours",
            Self::StoreTheme => "store-theme",
            Self::Review => "review",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Which draft image slot an upload step fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageField {
    Logo,
    Cover,
    HeroImage,
}

impl std::fmt::Display for ImageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logo => write!(f, "logo"),
            Self::Cover => write!(f, "cover photo"),
            Self::HeroImage => write!(f, "hero image"),
        }
    }
}

/// Validator applied to a free-text step before any state mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    NonEmpty,
    Email,
    Phone,
}

/// Multi-field or upload widget bound to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    ImageUpload(ImageField),
    Location,
    Hours,
}

/// Finite-option widget bound to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    StoreType,
    TypeConfirm,
    Category,
    SubdomainConfirm,
    Theme,
    ReviewActions,
}

/// The one input shape a step accepts from the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    FreeText(ValidatorKind),
    Form(FormKind),
    Selector(SelectorKind),
    None,
}

impl InputModality {
    /// Whether an event kind is the one this modality produces. Events from
    /// a stale or foreign widget must be rejected before they touch the
    /// draft or the transcript.
    pub fn accepts(&self, event: &StepEvent) -> bool {
        matches!(
            (self, event),
            (InputModality::FreeText(_), StepEvent::Text(_))
                | (
                    InputModality::Selector(SelectorKind::StoreType),
                    StepEvent::TypePicked(_)
                )
                | (
                    InputModality::Selector(SelectorKind::TypeConfirm),
                    StepEvent::KeepType | StepEvent::ChangeType
                )
                | (
                    InputModality::Selector(SelectorKind::Category),
                    StepEvent::CategoryPicked { .. }
                )
                | (
                    InputModality::Selector(SelectorKind::SubdomainConfirm),
                    StepEvent::KeepSubdomain | StepEvent::EditSubdomain
                )
                | (
                    InputModality::Selector(SelectorKind::Theme),
                    StepEvent::ThemePicked { .. }
                )
                | (
                    InputModality::Selector(SelectorKind::ReviewActions),
                    StepEvent::Submit
                )
                | (
                    InputModality::Form(FormKind::ImageUpload(_)),
                    StepEvent::ImageAccepted { .. } | StepEvent::ImageSkipped
                )
                | (
                    InputModality::Form(FormKind::Location),
                    StepEvent::LocationSubmitted(_)
                )
                | (
                    InputModality::Form(FormKind::Hours),
                    StepEvent::HoursSubmitted(_)
                )
        )
    }
}

/// A user action fed to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    /// Store type chosen at `SelectType`.
    TypePicked(StoreType),
    /// Keep the pre-selected type at `ConfirmType`.
    KeepType,
    /// Go back and pick a different type at `ConfirmType`.
    ChangeType,
    /// Category chosen at `StoreCategory`. The name is echoed, only the id
    /// is stored.
    CategoryPicked { id: i64, name: String },
    /// Free-text submission at any free-text step.
    Text(String),
    /// Accept the derived subdomain at `ConfirmSubdomain`.
    KeepSubdomain,
    /// Branch to `EditSubdomain` instead.
    EditSubdomain,
    /// An image upload succeeded at the current image step. The URL is
    /// already on the draft by the time the machine sees this.
    ImageAccepted { filename: String },
    /// The current image step was skipped.
    ImageSkipped,
    /// Location form submitted.
    LocationSubmitted(LocationForm),
    /// Opening-hours form submitted.
    HoursSubmitted(HoursForm),
    /// Theme chosen at `StoreTheme`.
    ThemePicked { id: i64, name: String },
    /// Final submission at `Review`.
    Submit,
}

impl StepEvent {
    /// Short label for error reporting and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TypePicked(_) => "type_picked",
            Self::KeepType => "keep_type",
            Self::ChangeType => "change_type",
            Self::CategoryPicked { .. } => "category_picked",
            Self::Text(_) => "text",
            Self::KeepSubdomain => "keep_subdomain",
            Self::EditSubdomain => "edit_subdomain",
            Self::ImageAccepted { .. } => "image_accepted",
            Self::ImageSkipped => "image_skipped",
            Self::LocationSubmitted(_) => "location_submitted",
            Self::HoursSubmitted(_) => "hours_submitted",
            Self::ThemePicked { .. } => "theme_picked",
            Self::Submit => "submit",
        }
    }

    /// The text echoed into the transcript as the user's turn. Widget
    /// selections echo a derived label rather than raw input.
    pub fn user_echo(&self) -> String {
        match self {
            Self::TypePicked(store_type) => format!("{store_type} store"),
            Self::KeepType => "Keep this type".to_string(),
            Self::ChangeType => "Change the type".to_string(),
            Self::CategoryPicked { name, .. } => name.clone(),
            Self::Text(text) => text.trim().to_string(),
            Self::KeepSubdomain => "Keep it".to_string(),
            Self::EditSubdomain => "Edit the address".to_string(),
            Self::ImageAccepted { filename } => format!("Uploaded {filename}"),
            Self::ImageSkipped => "Skip".to_string(),
            Self::LocationSubmitted(form) => {
                format!("{}, {}, {}", form.address, form.city, form.state)
            }
            Self::HoursSubmitted(form) => format!(
                "{}–{}, {}–{}",
                form.week_open, form.week_close, form.time_open, form.time_close
            ),
            Self::ThemePicked { name, .. } => name.clone(),
            Self::Submit => "Create my store".to_string(),
        }
    }
}

/// Result of a valid transition: the next step, its bot prompt, and the
/// input modality the view should expose.
#[derive(Debug, Clone)]
pub struct Transition {
    pub step: Step,
    pub bot_prompt: String,
    pub modality: InputModality,
}

/// The transition table. Exhaustive over [`Step`]; any (step, event) pair
/// not listed is a programmer error — valid inputs are filtered by the
/// per-step modality contract before they reach here.
///
/// The draft is read only to render context-dependent prompts (derived
/// subdomain, store name); it must already reflect the event.
pub fn next_step(
    current: Step,
    event: &StepEvent,
    draft: &StoreDraft,
) -> Result<Transition, StepError> {
    use Step::*;
    use StepEvent::*;

    let step = match (current, event) {
        (SelectType, TypePicked(_)) => StoreCategory,
        (ConfirmType, KeepType) => StoreCategory,
        (ConfirmType, ChangeType) => SelectType,
        (StoreCategory, CategoryPicked { .. }) => StoreName,
        (StoreName, Text(_)) => ConfirmSubdomain,
        (ConfirmSubdomain, KeepSubdomain) => StoreDescription,
        (ConfirmSubdomain, StepEvent::EditSubdomain) => Step::EditSubdomain,
        (Step::EditSubdomain, Text(_)) => StoreDescription,
        (StoreDescription, Text(_)) => StoreLogo,
        // Skip and upload success share one successor at every image step.
        (StoreLogo, ImageAccepted { .. } | ImageSkipped) => StoreCover,
        (StoreCover, ImageAccepted { .. } | ImageSkipped) => StoreHeroImage,
        (StoreHeroImage, ImageAccepted { .. } | ImageSkipped) => StoreHeroHeadline,
        (StoreHeroHeadline, Text(_)) => StoreHeroTagline,
        (StoreHeroTagline, Text(_)) => StoreEmail,
        (StoreEmail, Text(_)) => StorePhone,
        (StorePhone, Text(_)) => StoreLocation,
        (StoreLocation, LocationSubmitted(_)) => StoreHours,
        (StoreHours, HoursSubmitted(_)) => StoreTheme,
        (StoreTheme, ThemePicked { .. }) => Review,
        (Review, Submit) => Complete,
        _ => {
            return Err(StepError::UnexpectedEvent {
                step: current,
                event: event.label(),
            });
        }
    };

    Ok(Transition {
        step,
        bot_prompt: prompts::bot_prompt(step, draft),
        modality: step.modality(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::draft::Weekday;

    fn draft() -> StoreDraft {
        StoreDraft {
            store_name: Some("Ada's Bakery".to_string()),
            subdomain: Some("adas-bakery".to_string()),
            ..Default::default()
        }
    }

    fn text(s: &str) -> StepEvent {
        StepEvent::Text(s.to_string())
    }

    #[test]
    fn happy_path_walks_every_step() {
        let d = draft();
        let path = [
            (Step::SelectType, StepEvent::TypePicked(StoreType::Internal)),
            (
                Step::StoreCategory,
                StepEvent::CategoryPicked {
                    id: 3,
                    name: "Bakery".to_string(),
                },
            ),
            (Step::StoreName, text("Ada's Bakery")),
            (Step::ConfirmSubdomain, StepEvent::KeepSubdomain),
            (Step::StoreDescription, text("Fresh bread daily")),
            (Step::StoreLogo, StepEvent::ImageSkipped),
            (Step::StoreCover, StepEvent::ImageSkipped),
            (Step::StoreHeroImage, StepEvent::ImageSkipped),
            (Step::StoreHeroHeadline, text("Best Bread in Town")),
            (Step::StoreHeroTagline, text("Baked fresh every morning")),
            (Step::StoreEmail, text("ada@bakery.com")),
            (Step::StorePhone, text("08012345678")),
            (
                Step::StoreLocation,
                StepEvent::LocationSubmitted(LocationForm {
                    address: "12 Bread Ave".to_string(),
                    state: "Lagos".to_string(),
                    city: "Ikeja".to_string(),
                }),
            ),
            (
                Step::StoreHours,
                StepEvent::HoursSubmitted(HoursForm {
                    week_open: Weekday::Monday,
                    week_close: Weekday::Saturday,
                    time_open: "07:00".to_string(),
                    time_close: "19:00".to_string(),
                }),
            ),
            (
                Step::StoreTheme,
                StepEvent::ThemePicked {
                    id: 2,
                    name: "Warm Oven".to_string(),
                },
            ),
            (Step::Review, StepEvent::Submit),
        ];

        let mut current = Step::SelectType;
        for (expected_at, event) in path {
            assert_eq!(current, expected_at, "sequence diverged at {current}");
            current = next_step(current, &event, &d).unwrap().step;
        }
        assert_eq!(current, Step::Complete);
        assert!(current.is_terminal());
    }

    #[test]
    fn confirm_type_branches() {
        let d = draft();
        let keep = next_step(Step::ConfirmType, &StepEvent::KeepType, &d).unwrap();
        assert_eq!(keep.step, Step::StoreCategory);

        let change = next_step(Step::ConfirmType, &StepEvent::ChangeType, &d).unwrap();
        assert_eq!(change.step, Step::SelectType);
    }

    #[test]
    fn subdomain_confirmation_branches() {
        let d = draft();
        let keep = next_step(Step::ConfirmSubdomain, &StepEvent::KeepSubdomain, &d).unwrap();
        assert_eq!(keep.step, Step::StoreDescription);

        let edit = next_step(Step::ConfirmSubdomain, &StepEvent::EditSubdomain, &d).unwrap();
        assert_eq!(edit.step, Step::EditSubdomain);

        let after_edit = next_step(Step::EditSubdomain, &text("fresh bread"), &d).unwrap();
        assert_eq!(after_edit.step, Step::StoreDescription);
    }

    #[test]
    fn skip_and_upload_share_a_successor() {
        let d = draft();
        for (step, successor) in [
            (Step::StoreLogo, Step::StoreCover),
            (Step::StoreCover, Step::StoreHeroImage),
            (Step::StoreHeroImage, Step::StoreHeroHeadline),
        ] {
            let skipped = next_step(step, &StepEvent::ImageSkipped, &d).unwrap();
            let uploaded = next_step(
                step,
                &StepEvent::ImageAccepted {
                    filename: "logo.png".to_string(),
                },
                &d,
            )
            .unwrap();
            assert_eq!(skipped.step, successor);
            assert_eq!(uploaded.step, successor);
        }
    }

    #[test]
    fn unexpected_event_is_an_error() {
        let d = draft();
        let err = next_step(Step::StoreEmail, &StepEvent::Submit, &d).unwrap_err();
        assert!(matches!(
            err,
            StepError::UnexpectedEvent {
                step: Step::StoreEmail,
                event: "submit"
            }
        ));

        assert!(next_step(Step::Complete, &text("hello"), &d).is_err());
        assert!(next_step(Step::SelectType, &StepEvent::KeepType, &d).is_err());
    }

    #[test]
    fn initial_step_depends_on_preselection() {
        assert_eq!(Step::initial(false), Step::SelectType);
        assert_eq!(Step::initial(true), Step::ConfirmType);
    }

    #[test]
    fn every_step_declares_one_modality() {
        // Free-text steps carry a validator; widget steps carry their kind.
        assert_eq!(
            Step::StoreEmail.modality(),
            InputModality::FreeText(ValidatorKind::Email)
        );
        assert_eq!(
            Step::StorePhone.modality(),
            InputModality::FreeText(ValidatorKind::Phone)
        );
        assert_eq!(
            Step::StoreLogo.modality(),
            InputModality::Form(FormKind::ImageUpload(ImageField::Logo))
        );
        assert_eq!(
            Step::StoreTheme.modality(),
            InputModality::Selector(SelectorKind::Theme)
        );
        assert_eq!(Step::Complete.modality(), InputModality::None);
    }

    #[test]
    fn modality_accepts_only_its_own_event_kind() {
        let theme = StepEvent::ThemePicked {
            id: 9,
            name: "Sneaky".to_string(),
        };
        assert!(!Step::StoreEmail.modality().accepts(&theme));
        assert!(!Step::StoreEmail.modality().accepts(&StepEvent::Submit));
        assert!(Step::StoreEmail.modality().accepts(&text("ada@bakery.com")));

        assert!(Step::StoreTheme.modality().accepts(&theme));
        assert!(!Step::StoreTheme.modality().accepts(&text("2")));

        assert!(Step::StoreLogo.modality().accepts(&StepEvent::ImageSkipped));
        assert!(!Step::StoreLogo.modality().accepts(&StepEvent::KeepType));

        assert!(Step::Review.modality().accepts(&StepEvent::Submit));
        assert!(!Step::Complete.modality().accepts(&text("hello")));
    }

    #[test]
    fn user_echo_labels_widget_selections() {
        assert_eq!(
            StepEvent::CategoryPicked {
                id: 3,
                name: "Bakery".to_string()
            }
            .user_echo(),
            "Bakery"
        );
        assert_eq!(StepEvent::ImageSkipped.user_echo(), "Skip");
        assert_eq!(
            StepEvent::TypePicked(StoreType::Internal).user_echo(),
            "INTERNAL store"
        );
    }

    #[test]
    fn step_display_is_kebab_case_and_matches_serde() {
        let steps = [
            Step::SelectType,
            Step::ConfirmSubdomain,
            Step::StoreHeroImage,
            Step::Review,
            Step::Complete,
        ];
        for step in steps {
            let display = format!("{step}");
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
