//! Demonstration scenarios.
//!
//! Each scenario is one kind of fake login a trainer walks the class through.
//! Only teaching data lives here: what the page pretends to be and which
//! warning signs students should have spotted.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Email,
    Social,
    Banking,
}

/// Serializable description of a scenario for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInfo {
    pub label: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub red_flags: &'static [&'static str],
}

/// Warning signs common to every scenario.
pub const GENERAL_RED_FLAGS: &[&str] = &[
    "Urgency tactics: \"act now or lose access\"",
    "Misspelled or look-alike domains",
    "Generic greetings instead of your name",
    "Spelling and grammar mistakes",
];

pub const PREVENTION_TIPS: &[&str] = &[
    "Check the URL carefully before entering credentials",
    "Enable two-factor authentication on all accounts",
    "Never follow login links from unexpected messages",
    "Type addresses directly into the browser",
    "Keep software and browsers updated",
];

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Email, Scenario::Social, Scenario::Banking];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Email => "email",
            Scenario::Social => "social",
            Scenario::Banking => "banking",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
    }

    pub fn title(self) -> &'static str {
        match self {
            Scenario::Email => "Fake Webmail",
            Scenario::Social => "Fake Social Network",
            Scenario::Banking => "Fake Online Banking",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Scenario::Email => "Email Phishing",
            Scenario::Social => "Social Engineering",
            Scenario::Banking => "Financial Fraud",
        }
    }

    pub fn red_flags(self) -> &'static [&'static str] {
        match self {
            Scenario::Email => &[
                "Look-alike domain with a swapped character",
                "Threat of account suspension within 24 hours",
                "Generic greeting instead of your name",
                "No valid security indicators in the address bar",
            ],
            Scenario::Social => &[
                "Look-alike domain using a digit for a letter",
                "Social pressure: \"you have messages waiting\"",
                "Designed to trigger curiosity and fear of missing out",
                "No secure connection indicators",
            ],
            Scenario::Banking => &[
                "Asks for a PIN, which banks never request",
                "False urgency from a \"security alert\"",
                "Verification domain unrelated to the bank",
                "Arrives by email instead of the banking portal",
            ],
        }
    }

    pub fn info(self) -> ScenarioInfo {
        ScenarioInfo {
            label: self.label(),
            title: self.title(),
            subtitle: self.subtitle(),
            red_flags: self.red_flags(),
        }
    }
}
