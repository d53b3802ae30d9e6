//! The accumulating store record and its transient sub-forms.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::wizard::step::{ImageField, Step, StepEvent};
use crate::wizard::validators::{self, PhoneScheme};

/// Whether the store sells the platform's own inventory or an external
/// vendor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreType {
    Internal,
    External,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "INTERNAL"),
            Self::External => write!(f, "EXTERNAL"),
        }
    }
}

/// Day of the week, used for the opening-hours range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Case-insensitive parse of an English day name.
    pub fn parse(input: &str) -> Option<Weekday> {
        let lower = input.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().to_lowercase() == lower)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        write!(f, "{s}")
    }
}

/// Reference to a selected theme template. Only the external id (plus the
/// name for echoing) is stored — never a denormalized copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRef {
    pub id: i64,
    pub name: String,
}

/// The partially-built store record.
///
/// Every field is optional and set exactly once per step; a field is
/// populated if and only if its owning step has been passed through in the
/// current run. Later edits happen only through the explicit change-type /
/// edit-subdomain branches. The whole draft is discarded only by restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDraft {
    pub store_type: Option<StoreType>,
    pub store_category_id: Option<i64>,
    pub store_name: Option<String>,
    pub subdomain: Option<String>,
    pub store_description: Option<String>,
    pub store_logo_url: Option<String>,
    pub store_cover_url: Option<String>,
    pub store_hero_image_url: Option<String>,
    pub store_hero_headline: Option<String>,
    pub store_hero_tagline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub store_address: Option<String>,
    pub store_location_state: Option<String>,
    pub store_location_city: Option<String>,
    pub store_time_open: Option<String>,
    pub store_time_close: Option<String>,
    pub week_open: Option<Weekday>,
    pub week_close: Option<Weekday>,
    pub selected_theme: Option<ThemeRef>,
}

impl StoreDraft {
    /// Fold a step's accepted value into the draft. Total over every
    /// (step, event) pair: pairs that carry no draft data are no-ops.
    pub fn apply(&mut self, step: Step, event: &StepEvent, scheme: &PhoneScheme) {
        match (step, event) {
            (_, StepEvent::TypePicked(store_type)) => {
                self.store_type = Some(*store_type);
            }
            (_, StepEvent::CategoryPicked { id, .. }) => {
                self.store_category_id = Some(*id);
            }
            (Step::StoreName, StepEvent::Text(text)) => {
                self.store_name = Some(text.trim().to_string());
                self.subdomain = Some(validators::slugify_subdomain(text));
            }
            (Step::EditSubdomain, StepEvent::Text(text)) => {
                // Overwrites the derived candidate, same normalization.
                self.subdomain = Some(validators::slugify_subdomain(text));
            }
            (Step::StoreDescription, StepEvent::Text(text)) => {
                self.store_description = Some(text.trim().to_string());
            }
            (Step::StoreHeroHeadline, StepEvent::Text(text)) => {
                self.store_hero_headline = Some(text.trim().to_string());
            }
            (Step::StoreHeroTagline, StepEvent::Text(text)) => {
                self.store_hero_tagline = Some(text.trim().to_string());
            }
            (Step::StoreEmail, StepEvent::Text(text)) => {
                self.email = Some(text.trim().to_string());
            }
            (Step::StorePhone, StepEvent::Text(text)) => {
                self.phone = Some(validators::normalize_phone(text, scheme));
            }
            (_, StepEvent::LocationSubmitted(form)) => {
                self.store_address = Some(form.address.trim().to_string());
                self.store_location_state = Some(form.state.trim().to_string());
                self.store_location_city = Some(form.city.trim().to_string());
            }
            (_, StepEvent::HoursSubmitted(form)) => {
                self.week_open = Some(form.week_open);
                self.week_close = Some(form.week_close);
                self.store_time_open = Some(form.time_open.trim().to_string());
                self.store_time_close = Some(form.time_close.trim().to_string());
            }
            (_, StepEvent::ThemePicked { id, name }) => {
                self.selected_theme = Some(ThemeRef {
                    id: *id,
                    name: name.clone(),
                });
            }
            // Confirmations, skips, and submit carry no draft data.
            _ => {}
        }
    }

    /// Store the URL returned by a successful image upload.
    pub fn set_image(&mut self, field: ImageField, url: String) {
        match field {
            ImageField::Logo => self.store_logo_url = Some(url),
            ImageField::Cover => self.store_cover_url = Some(url),
            ImageField::HeroImage => self.store_hero_image_url = Some(url),
        }
    }
}

/// Transient multi-field input for the location step. Exists only while
/// that step is active; folded into the draft on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationForm {
    pub address: String,
    pub state: String,
    pub city: String,
}

impl LocationForm {
    /// All three fields are required.
    pub fn validate(&self) -> std::result::Result<(), FieldError> {
        if self.address.trim().is_empty() {
            return Err(FieldError::new("address", "Address is required"));
        }
        if self.state.trim().is_empty() {
            return Err(FieldError::new("state", "State is required"));
        }
        if self.city.trim().is_empty() {
            return Err(FieldError::new("city", "City is required"));
        }
        Ok(())
    }
}

/// Transient multi-field input for the opening-hours step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursForm {
    pub week_open: Weekday,
    pub week_close: Weekday,
    pub time_open: String,
    pub time_close: String,
}

impl HoursForm {
    pub fn validate(&self) -> std::result::Result<(), FieldError> {
        if !validators::validate_time(&self.time_open) {
            return Err(FieldError::new("time_open", "Opening time must be HH:MM"));
        }
        if !validators::validate_time(&self.time_close) {
            return Err(FieldError::new("time_close", "Closing time must be HH:MM"));
        }
        Ok(())
    }
}

/// Creation payload sent to the storefront API.
///
/// The shape is dictated by the external API: name, email, address, state,
/// city, and type are required; everything else is included only when the
/// owning step populated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStorePayload {
    pub store_type: StoreType,
    pub store_name: String,
    pub email: String,
    pub store_address: String,
    pub store_location_state: String,
    pub store_location_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_hero_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_hero_headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_hero_tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_time_open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_time_close: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_open: Option<Weekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_close: Option<Weekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<i64>,
}

impl CreateStorePayload {
    /// Assemble the payload from a draft, failing with a field-scoped error
    /// when a required field has not been populated.
    pub fn from_draft(draft: &StoreDraft) -> std::result::Result<Self, FieldError> {
        fn required<T: Clone>(
            value: &Option<T>,
            field: &str,
        ) -> std::result::Result<T, FieldError> {
            value
                .clone()
                .ok_or_else(|| FieldError::new(field, format!("{field} is required")))
        }

        Ok(Self {
            store_type: required(&draft.store_type, "store_type")?,
            store_name: required(&draft.store_name, "store_name")?,
            email: required(&draft.email, "email")?,
            store_address: required(&draft.store_address, "store_address")?,
            store_location_state: required(&draft.store_location_state, "store_location_state")?,
            store_location_city: required(&draft.store_location_city, "store_location_city")?,
            store_category_id: draft.store_category_id,
            subdomain: draft.subdomain.clone(),
            store_description: draft.store_description.clone(),
            store_logo_url: draft.store_logo_url.clone(),
            store_cover_url: draft.store_cover_url.clone(),
            store_hero_image_url: draft.store_hero_image_url.clone(),
            store_hero_headline: draft.store_hero_headline.clone(),
            store_hero_tagline: draft.store_hero_tagline.clone(),
            phone: draft.phone.clone(),
            store_time_open: draft.store_time_open.clone(),
            store_time_close: draft.store_time_close.clone(),
            week_open: draft.week_open,
            week_close: draft.week_close,
            theme_id: draft.selected_theme.as_ref().map(|t| t.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme() -> PhoneScheme {
        PhoneScheme::nigeria()
    }

    #[test]
    fn name_derives_subdomain() {
        let mut draft = StoreDraft::default();
        draft.apply(
            Step::StoreName,
            &StepEvent::Text("Ada's Bakery".to_string()),
            &scheme(),
        );
        assert_eq!(draft.store_name.as_deref(), Some("Ada's Bakery"));
        assert_eq!(draft.subdomain.as_deref(), Some("adas-bakery"));
    }

    #[test]
    fn edit_subdomain_overwrites_candidate() {
        let mut draft = StoreDraft::default();
        draft.apply(
            Step::StoreName,
            &StepEvent::Text("Ada's Bakery".to_string()),
            &scheme(),
        );
        draft.apply(
            Step::EditSubdomain,
            &StepEvent::Text("Fresh Bread Lagos".to_string()),
            &scheme(),
        );
        assert_eq!(draft.subdomain.as_deref(), Some("fresh-bread-lagos"));
        // Name is untouched by the subdomain edit.
        assert_eq!(draft.store_name.as_deref(), Some("Ada's Bakery"));
    }

    #[test]
    fn phone_is_normalized_on_apply() {
        let mut draft = StoreDraft::default();
        draft.apply(
            Step::StorePhone,
            &StepEvent::Text("0801 234 5678".to_string()),
            &scheme(),
        );
        assert_eq!(draft.phone.as_deref(), Some("+23408012345678"));
    }

    #[test]
    fn skip_events_leave_draft_untouched() {
        let mut draft = StoreDraft::default();
        draft.apply(Step::StoreLogo, &StepEvent::ImageSkipped, &scheme());
        assert!(draft.store_logo_url.is_none());
    }

    #[test]
    fn set_image_routes_to_the_right_field() {
        let mut draft = StoreDraft::default();
        draft.set_image(ImageField::Cover, "https://cdn.example/c.png".to_string());
        assert!(draft.store_logo_url.is_none());
        assert_eq!(
            draft.store_cover_url.as_deref(),
            Some("https://cdn.example/c.png")
        );
    }

    #[test]
    fn location_form_requires_all_fields() {
        let form = LocationForm {
            address: "12 Bread Ave".to_string(),
            state: String::new(),
            city: "Ikeja".to_string(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "state");

        let full = LocationForm {
            address: "12 Bread Ave".to_string(),
            state: "Lagos".to_string(),
            city: "Ikeja".to_string(),
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn hours_form_rejects_bad_times() {
        let form = HoursForm {
            week_open: Weekday::Monday,
            week_close: Weekday::Saturday,
            time_open: "7am".to_string(),
            time_close: "19:00".to_string(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "time_open");
    }

    #[test]
    fn payload_requires_core_fields() {
        let draft = StoreDraft {
            store_type: Some(StoreType::Internal),
            store_name: Some("Ada's Bakery".to_string()),
            email: Some("ada@bakery.com".to_string()),
            store_address: Some("12 Bread Ave".to_string()),
            store_location_state: Some("Lagos".to_string()),
            ..Default::default()
        };
        let err = CreateStorePayload::from_draft(&draft).unwrap_err();
        assert_eq!(err.field, "store_location_city");
    }

    #[test]
    fn payload_omits_unset_optionals() {
        let draft = StoreDraft {
            store_type: Some(StoreType::External),
            store_name: Some("Shop".to_string()),
            email: Some("s@shop.com".to_string()),
            store_address: Some("1 Road".to_string()),
            store_location_state: Some("Lagos".to_string()),
            store_location_city: Some("Ikeja".to_string()),
            ..Default::default()
        };
        let payload = CreateStorePayload::from_draft(&draft).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("store_logo_url").is_none());
        assert!(json.get("theme_id").is_none());
        assert_eq!(json["store_type"], "EXTERNAL");
    }

    #[test]
    fn weekday_parse_is_case_insensitive() {
        assert_eq!(Weekday::parse("monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse(" SATURDAY "), Some(Weekday::Saturday));
        assert_eq!(Weekday::parse("someday"), None);
    }
}
