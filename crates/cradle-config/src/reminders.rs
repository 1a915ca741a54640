//! Reminder defaults applied to newly created vaccination records.

use serde::{Deserialize, Serialize};

/// Default days between reminder emails for one pending dose.
const fn default_interval_days() -> u32 {
    7
}

/// Reminders are on unless the caregiver opts out.
const fn default_email_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReminderConfig {
    /// Days between reminders for the same pending dose.
    #[serde(default = "default_interval_days")]
    pub interval_days: u32,

    /// Whether email reminders start enabled on new records.
    #[serde(default = "default_email_enabled")]
    pub email_enabled: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_days: default_interval_days(),
            email_enabled: default_email_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ReminderConfig::default();
        assert_eq!(config.interval_days, 7);
        assert!(config.email_enabled);
    }
}
