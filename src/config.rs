//! Configuration types.

use std::time::Duration;

use crate::wizard::validators::PhoneScheme;

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Fixed "typing" delay before each bot reply. Simulates deliberation;
    /// not tied to any real latency.
    pub typing_delay: Duration,
    /// Delay between a successful creation and the scheduled redirect.
    pub redirect_delay: Duration,
    /// Phone numbering scheme used to normalize contact numbers.
    pub phone_scheme: PhoneScheme,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(800),
            redirect_delay: Duration::from_secs(3),
            phone_scheme: PhoneScheme::nigeria(),
        }
    }
}
