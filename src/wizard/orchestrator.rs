//! Async orchestrator — sequences user input → echo → typing delay → bot
//! response → step advance.
//!
//! One logical thread of conversation: the busy/uploading/submitting flags
//! make a second action a no-op while the first is still being processed,
//! covering both the simulated delay and genuine network calls. Messages
//! are appended strictly in completion order; the user turn for an action
//! always precedes the bot turn that answers it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::{StorefrontApi, ThemeFilter};
use crate::config::WizardConfig;
use crate::error::{FieldError, Result, StepError, WizardError};
use crate::wizard::draft::{CreateStorePayload, StoreDraft, StoreType};
use crate::wizard::prompts;
use crate::wizard::session::WizardSession;
use crate::wizard::step::{
    self, FormKind, InputModality, Step, StepEvent, Transition, ValidatorKind,
};
use crate::wizard::transcript::Widget;
use crate::wizard::validators;

/// Drives one wizard session against the storefront API.
pub struct WizardOrchestrator {
    api: Arc<dyn StorefrontApi>,
    config: WizardConfig,
    session: Arc<RwLock<WizardSession>>,
}

impl WizardOrchestrator {
    pub fn new(api: Arc<dyn StorefrontApi>, config: WizardConfig) -> Self {
        Self {
            api,
            config,
            session: Arc::new(RwLock::new(WizardSession::new())),
        }
    }

    /// Shared handle to the session. The view layer takes read locks only.
    pub fn session(&self) -> Arc<RwLock<WizardSession>> {
        Arc::clone(&self.session)
    }

    /// Seed a fresh session: one greeting message and the entry step.
    /// `pre_selected` picks the `ConfirmType` branch over `SelectType`.
    pub async fn start(&self, pre_selected: Option<StoreType>) {
        let mut s = self.session.write().await;
        s.pre_selected = pre_selected;
        seed_greeting(&mut s);
    }

    /// Process one user action. Fire-and-forget from the caller's
    /// perspective: outcomes are observable via the session. Invalid input
    /// sets a field error and changes nothing else; actions arriving while
    /// another is in flight are no-ops.
    pub async fn submit(&self, event: StepEvent) -> Result<()> {
        if matches!(event, StepEvent::Submit) {
            return self.handle_complete().await;
        }

        let (current, generation) = {
            let mut s = self.session.write().await;
            if s.step.is_terminal() {
                return Ok(());
            }
            if s.in_flight() {
                debug!(step = %s.step, event = event.label(), "Action ignored: busy");
                return Ok(());
            }

            // Gate 1: the event kind must be the one the current widget
            // produces. A misdirected event is rejected before it can touch
            // the draft, the transcript, or any collaborator.
            if !s.modality.accepts(&event) {
                return Err(StepError::UnexpectedEvent {
                    step: s.step,
                    event: event.label(),
                }
                .into());
            }

            // Gate 2: validate contents before any state mutation. Rejected
            // input appends nothing to the transcript.
            if let Err(field_error) = validate_event(s.modality, &event) {
                debug!(step = %s.step, field = %field_error.field, "Input rejected");
                s.field_error = Some(field_error.clone());
                return Err(WizardError::Validation(field_error));
            }

            s.field_error = None;
            let step = s.step;
            s.draft.apply(step, &event, &self.config.phone_scheme);
            s.transcript.push_user(event.user_echo());
            s.busy = true;
            s.input_disabled = true;
            (step, s.generation())
        };

        // Download-count bump fires once at selection time, independent of
        // the step transition. Failures are logged and swallowed.
        if let StepEvent::ThemePicked { id, .. } = &event {
            if let Err(e) = self.api.increment_theme_downloads(*id).await {
                warn!(theme_id = *id, "Failed to bump theme downloads: {e}");
            }
        }

        // Simulated deliberation; not tied to any real latency.
        tokio::time::sleep(self.config.typing_delay).await;

        let transition = {
            let s = self.session.read().await;
            if s.generation() != generation {
                debug!("Stale submission dropped after restart");
                return Ok(());
            }
            match step::next_step(current, &event, &s.draft) {
                Ok(t) => t,
                Err(e) => {
                    drop(s);
                    self.session.write().await.busy = false;
                    return Err(e.into());
                }
            }
        };

        let loaded = self.load_selector_data(transition.step).await;

        let mut s = self.session.write().await;
        if s.generation() != generation {
            debug!("Stale submission dropped after restart");
            return Ok(());
        }
        match loaded {
            SelectorData::Categories(categories) => s.categories = categories,
            SelectorData::Themes(themes) => s.themes = themes,
            SelectorData::None => {}
        }
        apply_transition(&mut s, transition);
        s.busy = false;
        Ok(())
    }

    /// Upload an image for the current image step. Real I/O replaces the
    /// simulated typing delay here. On success the returned URL is stored
    /// and the step advances exactly as a skip would; on failure the error
    /// is surfaced inline and the step does not advance.
    pub async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<()> {
        let (field, generation) = {
            let mut s = self.session.write().await;
            let InputModality::Form(FormKind::ImageUpload(field)) = s.modality else {
                return Err(StepError::UnexpectedEvent {
                    step: s.step,
                    event: "image_accepted",
                }
                .into());
            };
            if s.in_flight() {
                debug!(step = %s.step, "Upload ignored: busy");
                return Ok(());
            }
            s.uploading = true;
            s.field_error = None;
            (field, s.generation())
        };

        match self.api.upload_image(bytes, filename).await {
            Ok(image) => {
                let mut s = self.session.write().await;
                if s.generation() != generation {
                    debug!("Stale upload result dropped after restart");
                    return Ok(());
                }
                s.uploading = false;
                s.draft.set_image(field, image.url);

                let event = StepEvent::ImageAccepted {
                    filename: filename.to_string(),
                };
                s.transcript.push_user(event.user_echo());
                let transition = step::next_step(s.step, &event, &s.draft)?;
                apply_transition(&mut s, transition);
                Ok(())
            }
            Err(e) => {
                let mut s = self.session.write().await;
                if s.generation() != generation {
                    debug!("Stale upload error dropped after restart");
                    return Ok(());
                }
                s.uploading = false;
                let message = e.to_string();
                s.field_error = Some(FieldError::new("image", message.clone()));
                Err(WizardError::Upload(message))
            }
        }
    }

    /// Skip the current image step. Same successor as a successful upload;
    /// the draft field is simply left unset.
    pub async fn skip_image(&self) -> Result<()> {
        self.submit(StepEvent::ImageSkipped).await
    }

    /// Terminal submission: assemble the creation payload and call the
    /// backend exactly once. Repeated triggers while in flight are no-ops.
    /// On failure the step stays at `Review` so the user can retry or
    /// restart.
    pub async fn handle_complete(&self) -> Result<()> {
        let (payload, generation) = {
            let mut s = self.session.write().await;
            if s.step != Step::Review {
                return Err(StepError::UnexpectedEvent {
                    step: s.step,
                    event: "submit",
                }
                .into());
            }
            if s.in_flight() {
                debug!("Creation already in flight; submit ignored");
                return Ok(());
            }
            let payload = match CreateStorePayload::from_draft(&s.draft) {
                Ok(p) => p,
                Err(field_error) => {
                    s.field_error = Some(field_error.clone());
                    return Err(WizardError::Validation(field_error));
                }
            };
            s.transcript.push_user(StepEvent::Submit.user_echo());
            s.submitting = true;
            s.error = None;
            s.input_disabled = true;
            (payload, s.generation())
        };

        match self.api.create_store(&payload).await {
            Ok(created) => {
                let mut s = self.session.write().await;
                if s.generation() != generation {
                    debug!("Stale creation result dropped after restart");
                    return Ok(());
                }
                s.submitting = false;
                let transition = step::next_step(Step::Review, &StepEvent::Submit, &s.draft)?;
                apply_transition(&mut s, transition);
                drop(s);
                self.schedule_redirect(created.id, generation);
                Ok(())
            }
            Err(e) => {
                let mut s = self.session.write().await;
                if s.generation() != generation {
                    debug!("Stale creation error dropped after restart");
                    return Ok(());
                }
                s.submitting = false;
                let message = e.to_string();
                s.transcript.push_bot(
                    format!(
                        "Something went wrong creating your store: {message} \
                         You can try again, or restart from the beginning."
                    ),
                    None,
                );
                s.error = Some(message.clone());
                Err(WizardError::Creation(message))
            }
        }
    }

    /// Full restart: equivalent to a fresh session. Outstanding network
    /// calls are not aborted; their results are invalidated by the
    /// generation bump and dropped when they resolve.
    pub async fn handle_restart(&self) {
        let mut s = self.session.write().await;
        s.bump_generation();
        s.draft = StoreDraft::default();
        s.transcript.clear();
        s.field_error = None;
        s.error = None;
        s.busy = false;
        s.uploading = false;
        s.submitting = false;
        s.redirect_to = None;
        s.categories.clear();
        s.themes.clear();
        seed_greeting(&mut s);
    }

    /// Fetch the option list for a selector step about to be entered.
    /// Failures are logged; the selector renders empty and the user can
    /// restart.
    async fn load_selector_data(&self, step: Step) -> SelectorData {
        match step {
            Step::StoreCategory => {
                let store_type = {
                    self.session
                        .read()
                        .await
                        .draft
                        .store_type
                        .unwrap_or(StoreType::Internal)
                };
                match self.api.list_categories(store_type).await {
                    Ok(categories) => SelectorData::Categories(categories),
                    Err(e) => {
                        warn!("Failed to load categories: {e}");
                        SelectorData::Categories(Vec::new())
                    }
                }
            }
            Step::StoreTheme => match self.api.list_themes(&ThemeFilter::default()).await {
                Ok(themes) => SelectorData::Themes(themes),
                Err(e) => {
                    warn!("Failed to load themes: {e}");
                    SelectorData::Themes(Vec::new())
                }
            },
            _ => SelectorData::None,
        }
    }

    /// After a successful creation, navigate away once the fixed delay
    /// elapses — unless the session restarted in the meantime.
    fn schedule_redirect(&self, store_id: i64, generation: u64) {
        let session = Arc::clone(&self.session);
        let delay = self.config.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut s = session.write().await;
            if s.generation() != generation {
                debug!("Stale redirect dropped after restart");
                return;
            }
            s.redirect_to = Some(format!("/stores/{store_id}/dashboard"));
        });
    }
}

enum SelectorData {
    Categories(Vec<crate::api::Category>),
    Themes(Vec<crate::api::ThemeTemplate>),
    None,
}

/// Reset the flow to its entry branch and speak the greeting. Exactly one
/// bot message, so a restarted transcript holds exactly one entry.
fn seed_greeting(s: &mut WizardSession) {
    s.draft = StoreDraft::default();
    if let Some(store_type) = s.pre_selected {
        s.draft.store_type = Some(store_type);
    }
    let step = Step::initial(s.pre_selected.is_some());
    let text = prompts::greeting(s.pre_selected, &s.draft);
    let transition = Transition {
        step,
        bot_prompt: text,
        modality: step.modality(),
    };
    apply_transition(s, transition);
}

/// Append the bot turn and expose the next step's modality to the view.
fn apply_transition(s: &mut WizardSession, transition: Transition) {
    let widget = Widget::for_modality(&transition.modality, s.draft.subdomain.as_deref());
    s.transcript.push_bot(transition.bot_prompt, widget);
    s.step = transition.step;
    s.modality = transition.modality;
    let free_text = matches!(transition.modality, InputModality::FreeText(_));
    s.input_disabled = !free_text;
    s.focus_input = free_text;
}

/// Validate the user-supplied contents of an event already known to match
/// the step's modality. Only free-text and form payloads can fail here;
/// selector events carry no user-typed data.
fn validate_event(
    modality: InputModality,
    event: &StepEvent,
) -> std::result::Result<(), FieldError> {
    match (modality, event) {
        (InputModality::FreeText(validator), StepEvent::Text(text)) => {
            let text = text.trim();
            match validator {
                ValidatorKind::NonEmpty if text.is_empty() => {
                    Err(FieldError::new("input", "Please type an answer"))
                }
                ValidatorKind::Email if !validators::validate_email(text) => Err(FieldError::new(
                    "email",
                    "That doesn't look like a valid email address",
                )),
                ValidatorKind::Phone if !validators::validate_phone(text) => Err(FieldError::new(
                    "phone",
                    "That doesn't look like a valid phone number",
                )),
                _ => Ok(()),
            }
        }
        (_, StepEvent::LocationSubmitted(form)) => form.validate(),
        (_, StepEvent::HoursSubmitted(form)) => form.validate(),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockStorefrontApi;
    use crate::wizard::transcript::Speaker;

    fn orchestrator() -> (Arc<MockStorefrontApi>, WizardOrchestrator) {
        let api = Arc::new(MockStorefrontApi::new());
        let orch = WizardOrchestrator::new(api.clone(), WizardConfig::default());
        (api, orch)
    }

    #[tokio::test(start_paused = true)]
    async fn start_seeds_exactly_one_greeting() {
        let (_, orch) = orchestrator();
        orch.start(None).await;

        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.transcript.len(), 1);
        assert_eq!(s.transcript.messages()[0].speaker, Speaker::Bot);
        assert_eq!(s.step, Step::SelectType);
    }

    #[tokio::test(start_paused = true)]
    async fn preselected_type_starts_at_confirmation() {
        let (_, orch) = orchestrator();
        orch.start(Some(StoreType::External)).await;

        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.step, Step::ConfirmType);
        assert_eq!(s.draft.store_type, Some(StoreType::External));
    }

    #[tokio::test(start_paused = true)]
    async fn change_type_branch_returns_to_selection() {
        let (_, orch) = orchestrator();
        orch.start(Some(StoreType::Internal)).await;
        orch.submit(StepEvent::ChangeType).await.unwrap();

        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.step, Step::SelectType);
    }

    #[tokio::test(start_paused = true)]
    async fn user_turn_precedes_bot_turn() {
        let (_, orch) = orchestrator();
        orch.start(None).await;
        orch.submit(StepEvent::TypePicked(StoreType::Internal))
            .await
            .unwrap();

        let session = orch.session();
        let s = session.read().await;
        let speakers: Vec<Speaker> = s.transcript.messages().iter().map(|m| m.speaker).collect();
        assert_eq!(speakers, vec![Speaker::Bot, Speaker::User, Speaker::Bot]);
        assert_eq!(s.step, Step::StoreCategory);
        // Categories were loaded on entry.
        assert!(!s.categories.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_email_sets_field_error_and_does_not_advance() {
        let (_, orch) = orchestrator();
        orch.start(None).await;
        walk_to_email(&orch).await;

        let before = { orch.session().read().await.transcript.len() };
        let err = orch
            .submit(StepEvent::Text("not-an-email".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));

        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.step, Step::StoreEmail);
        assert_eq!(s.transcript.len(), before, "rejected input appends nothing");
        assert_eq!(s.field_error.as_ref().unwrap().field, "email");
        drop(s);

        // Resubmission with a valid value advances to the phone step.
        orch.submit(StepEvent::Text("ada@bakery.com".to_string()))
            .await
            .unwrap();
        let s = session.read().await;
        assert_eq!(s.step, Step::StorePhone);
        assert!(s.field_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn misdirected_widget_event_changes_nothing() {
        let (api, orch) = orchestrator();
        orch.start(None).await;
        walk_to_email(&orch).await;

        let before = {
            let session = orch.session();
            let s = session.read().await;
            (s.transcript.len(), s.input_disabled)
        };
        let err = orch
            .submit(StepEvent::ThemePicked {
                id: 9,
                name: "Sneaky".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::Step(StepError::UnexpectedEvent {
                step: Step::StoreEmail,
                event: "theme_picked"
            })
        ));

        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.step, Step::StoreEmail);
        assert!(
            s.draft.selected_theme.is_none(),
            "rejected event must not populate draft fields its step never reached"
        );
        assert_eq!(s.transcript.len(), before.0, "no user echo is appended");
        assert_eq!(s.input_disabled, before.1);
        assert!(!s.busy);
        assert!(
            api.theme_increments().is_empty(),
            "no download bump for a rejected selection"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn upload_failure_surfaces_inline_and_allows_retry_or_skip() {
        let (api, orch) = orchestrator();
        orch.start(None).await;
        walk_to_logo(&orch).await;

        api.fail_uploads_with("File too large");
        let err = orch.upload_image(vec![0u8; 4], "logo.png").await.unwrap_err();
        assert!(matches!(err, WizardError::Upload(_)));

        let session = orch.session();
        {
            let s = session.read().await;
            assert_eq!(s.step, Step::StoreLogo, "upload failure does not advance");
            assert_eq!(s.field_error.as_ref().unwrap().message, "File too large");
        }

        // Retry succeeds and stores the URL.
        api.clear_upload_failure();
        orch.upload_image(vec![0u8; 4], "logo.png").await.unwrap();
        let s = session.read().await;
        assert_eq!(s.step, Step::StoreCover);
        assert_eq!(
            s.draft.store_logo_url.as_deref(),
            Some("https://cdn.example/uploads/logo.png")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn theme_selection_bumps_downloads_once() {
        let (api, orch) = orchestrator();
        orch.start(None).await;
        walk_to_theme(&orch).await;

        orch.submit(StepEvent::ThemePicked {
            id: 2,
            name: "Warm Oven".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(api.theme_increments(), vec![2]);
        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.step, Step::Review);
        assert_eq!(s.draft.selected_theme.as_ref().unwrap().id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_to_one_greeting_and_empty_draft() {
        let (_, orch) = orchestrator();
        orch.start(None).await;
        walk_to_email(&orch).await;

        orch.handle_restart().await;

        let session = orch.session();
        let s = session.read().await;
        assert_eq!(s.transcript.len(), 1);
        assert_eq!(s.transcript.messages()[0].speaker, Speaker::Bot);
        assert_eq!(s.step, Step::SelectType);
        assert!(s.draft.store_name.is_none());
        assert!(s.draft.email.is_none());
        assert!(!s.in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn creation_failure_keeps_step_at_review() {
        let (api, orch) = orchestrator();
        api.fail_creation_with("Subdomain already taken");
        orch.start(None).await;
        walk_to_review(&orch).await;

        let err = orch.handle_complete().await.unwrap_err();
        assert!(matches!(err, WizardError::Creation(_)));

        let session = orch.session();
        {
            let s = session.read().await;
            assert_eq!(s.step, Step::Review);
            assert_eq!(s.error.as_deref(), Some("Subdomain already taken"));
            let last = s.transcript.last().unwrap();
            assert_eq!(last.speaker, Speaker::Bot);
            assert!(last.text.contains("Subdomain already taken"));
        }

        // Fully retryable.
        api.clear_creation_failure();
        orch.handle_complete().await.unwrap();
        let s = session.read().await;
        assert_eq!(s.step, Step::Complete);
        assert_eq!(api.create_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_is_scheduled_after_success() {
        let (_, orch) = orchestrator();
        orch.start(None).await;
        walk_to_review(&orch).await;
        orch.handle_complete().await.unwrap();

        let session = orch.session();
        {
            let s = session.read().await;
            assert_eq!(s.step, Step::Complete);
            assert!(s.redirect_to.is_none(), "redirect waits for the delay");
        }

        tokio::time::sleep(WizardConfig::default().redirect_delay * 2).await;
        let s = session.read().await;
        assert_eq!(s.redirect_to.as_deref(), Some("/stores/42/dashboard"));
    }

    // ── Walk helpers ────────────────────────────────────────────────

    async fn walk_to_logo(orch: &WizardOrchestrator) {
        orch.submit(StepEvent::TypePicked(StoreType::Internal))
            .await
            .unwrap();
        orch.submit(StepEvent::CategoryPicked {
            id: 3,
            name: "Bakery".to_string(),
        })
        .await
        .unwrap();
        orch.submit(StepEvent::Text("Ada's Bakery".to_string()))
            .await
            .unwrap();
        orch.submit(StepEvent::KeepSubdomain).await.unwrap();
        orch.submit(StepEvent::Text("Fresh bread daily".to_string()))
            .await
            .unwrap();
    }

    async fn walk_to_email(orch: &WizardOrchestrator) {
        walk_to_logo(orch).await;
        orch.skip_image().await.unwrap();
        orch.skip_image().await.unwrap();
        orch.skip_image().await.unwrap();
        orch.submit(StepEvent::Text("Best Bread in Town".to_string()))
            .await
            .unwrap();
        orch.submit(StepEvent::Text("Baked fresh every morning".to_string()))
            .await
            .unwrap();
    }

    async fn walk_to_theme(orch: &WizardOrchestrator) {
        walk_to_email(orch).await;
        orch.submit(StepEvent::Text("ada@bakery.com".to_string()))
            .await
            .unwrap();
        orch.submit(StepEvent::Text("08012345678".to_string()))
            .await
            .unwrap();
        orch.submit(StepEvent::LocationSubmitted(
            crate::wizard::draft::LocationForm {
                address: "12 Bread Ave".to_string(),
                state: "Lagos".to_string(),
                city: "Ikeja".to_string(),
            },
        ))
        .await
        .unwrap();
        orch.submit(StepEvent::HoursSubmitted(crate::wizard::draft::HoursForm {
            week_open: crate::wizard::draft::Weekday::Monday,
            week_close: crate::wizard::draft::Weekday::Saturday,
            time_open: "07:00".to_string(),
            time_close: "19:00".to_string(),
        }))
        .await
        .unwrap();
    }

    async fn walk_to_review(orch: &WizardOrchestrator) {
        walk_to_theme(orch).await;
        orch.submit(StepEvent::ThemePicked {
            id: 2,
            name: "Warm Oven".to_string(),
        })
        .await
        .unwrap();
    }
}
