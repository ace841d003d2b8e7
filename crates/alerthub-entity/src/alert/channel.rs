//! Delivery channel enumeration.

use serde::{Deserialize, Serialize};

/// Channel an alert asks to be delivered through.
///
/// Only in-app delivery exists; other channels fall back to it and the
/// requested channel is kept on the delivery event for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    /// In-app notification feed.
    #[default]
    InApp,
    /// Email.
    Email,
    /// SMS.
    Sms,
}

impl DeliveryChannel {
    /// Return the channel as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
