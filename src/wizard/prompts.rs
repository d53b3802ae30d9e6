//! Bot prompt copy for each step.

use crate::wizard::draft::{StoreDraft, StoreType};
use crate::wizard::step::Step;

/// Domain suffix shown when confirming the derived subdomain.
const STORE_DOMAIN: &str = "mystorefront.shop";

/// The opening bot message for a fresh session. One message: greeting plus
/// the first question, so a restarted transcript holds exactly one entry.
pub fn greeting(pre_selected: Option<StoreType>, draft: &StoreDraft) -> String {
    match pre_selected {
        Some(_) => format!(
            "Hi! I'm your store setup assistant — let's get your store online in a few minutes. {}",
            bot_prompt(Step::ConfirmType, draft)
        ),
        None => format!(
            "Hi! I'm your store setup assistant — let's get your store online in a few minutes. {}",
            bot_prompt(Step::SelectType, draft)
        ),
    }
}

/// The prompt the bot speaks on arriving at `step`.
///
/// The draft supplies context for the handful of prompts that reference
/// earlier answers (store name, derived subdomain).
pub fn bot_prompt(step: Step, draft: &StoreDraft) -> String {
    let name = draft.store_name.as_deref().unwrap_or("your store");
    match step {
        Step::SelectType => "What kind of store are you setting up? Pick one below.".to_string(),
        Step::ConfirmType => {
            let store_type = draft
                .store_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "this".to_string());
            format!("You're setting up an {store_type} store. Keep it, or change the type?")
        }
        Step::StoreCategory => "Great choice! Which category fits your store best?".to_string(),
        Step::StoreName => "What should we call your store?".to_string(),
        Step::ConfirmSubdomain => {
            let sub = draft.subdomain.as_deref().unwrap_or("your-store");
            format!(
                "Love it! Your store will live at {sub}.{STORE_DOMAIN} — keep this address, or edit it?"
            )
        }
        Step::EditSubdomain => {
            "No problem — type the address you'd like. I'll tidy it into a valid subdomain."
                .to_string()
        }
        Step::StoreDescription => {
            format!("Tell me a little about {name} — one or two sentences is perfect.")
        }
        Step::StoreLogo => "Time to make it yours. Upload a logo, or skip for now.".to_string(),
        Step::StoreCover => "Looking good! Add a cover photo, or skip.".to_string(),
        Step::StoreHeroImage => {
            "One more — a hero image for your homepage banner, or skip.".to_string()
        }
        Step::StoreHeroHeadline => "What headline should visitors see first?".to_string(),
        Step::StoreHeroTagline => "And a short tagline to go under it?".to_string(),
        Step::StoreEmail => {
            "Almost there! What email address should customers reach you at?".to_string()
        }
        Step::StorePhone => "And a phone number?".to_string(),
        Step::StoreLocation => {
            format!("Where is {name} located? Fill in the address below.")
        }
        Step::StoreHours => "When are you open? Set your weekly hours.".to_string(),
        Step::StoreTheme => "Last step — pick a theme for your storefront.".to_string(),
        Step::Review => {
            "Here's everything I've got. Ready to create your store?".to_string()
        }
        Step::Complete => celebration(draft),
    }
}

/// The celebratory message appended after a successful creation call.
pub fn celebration(draft: &StoreDraft) -> String {
    let name = draft.store_name.as_deref().unwrap_or("Your store");
    format!("🎉 {name} is live! Taking you to your dashboard…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_subdomain_prompt_includes_candidate() {
        let draft = StoreDraft {
            subdomain: Some("adas-bakery".to_string()),
            ..Default::default()
        };
        let prompt = bot_prompt(Step::ConfirmSubdomain, &draft);
        assert!(prompt.contains("adas-bakery.mystorefront.shop"));
    }

    #[test]
    fn description_prompt_uses_store_name() {
        let draft = StoreDraft {
            store_name: Some("Ada's Bakery".to_string()),
            ..Default::default()
        };
        assert!(bot_prompt(Step::StoreDescription, &draft).contains("Ada's Bakery"));
    }

    #[test]
    fn greeting_is_a_single_message_with_first_question() {
        let draft = StoreDraft::default();
        let plain = greeting(None, &draft);
        assert!(plain.contains("What kind of store"));

        let confirmed_draft = StoreDraft {
            store_type: Some(StoreType::Internal),
            ..Default::default()
        };
        let confirm = greeting(Some(StoreType::Internal), &confirmed_draft);
        assert!(confirm.contains("INTERNAL"));
    }
}
