//! Life Domain Types
//!
//! A closed set of life areas used to select keyword lexicons and
//! adjustment tables. Anything unrecognized lands in [`Domain::Unknown`]
//! so callers can see it instead of silently losing the domain signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Life area a survey question belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    WorkCareer,
    PersonalLife,
    FinancialStress,
    Health,
    SelfWorth,
    /// Unrecognized label, kept verbatim
    Unknown(String),
}

impl Domain {
    /// All known domains in display order
    pub const KNOWN: [Domain; 5] = [
        Domain::WorkCareer,
        Domain::PersonalLife,
        Domain::FinancialStress,
        Domain::Health,
        Domain::SelfWorth,
    ];

    /// Parse a free-form label. Never fails; unknown labels are preserved.
    pub fn parse(label: &str) -> Self {
        match Self::normalize(label).as_str() {
            "workcareer" | "work" | "career" | "workandcareer" => Domain::WorkCareer,
            "personallife" | "personal" | "relationships" => Domain::PersonalLife,
            "financialstress" | "financial" | "finances" | "finance" | "money" => {
                Domain::FinancialStress
            }
            "health" | "physicalhealth" | "wellbeing" => Domain::Health,
            "selfworthidentity" | "selfworth" | "identity" | "selfworthandidentity" => {
                Domain::SelfWorth
            }
            _ => Domain::Unknown(label.trim().to_string()),
        }
    }

    /// Lookup key used by lexicon tables (`work`, `personal`, ...)
    pub fn key(&self) -> &str {
        match self {
            Domain::WorkCareer => "work",
            Domain::PersonalLife => "personal",
            Domain::FinancialStress => "financial",
            Domain::Health => "health",
            Domain::SelfWorth => "self_worth",
            Domain::Unknown(_) => "unknown",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Domain::WorkCareer => "Work & Career",
            Domain::PersonalLife => "Personal Life",
            Domain::FinancialStress => "Financial Stress",
            Domain::Health => "Health",
            Domain::SelfWorth => "Self-Worth & Identity",
            Domain::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Domain::Unknown(_))
    }

    fn normalize(label: &str) -> String {
        label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for Domain {
    fn from(s: String) -> Self {
        Domain::parse(&s)
    }
}

impl From<&str> for Domain {
    fn from(s: &str) -> Self {
        Domain::parse(s)
    }
}

impl From<Domain> for String {
    fn from(d: Domain) -> Self {
        d.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_labels() {
        assert_eq!(Domain::parse("Work & Career"), Domain::WorkCareer);
        assert_eq!(Domain::parse("Personal Life"), Domain::PersonalLife);
        assert_eq!(Domain::parse("Financial Stress"), Domain::FinancialStress);
        assert_eq!(Domain::parse("Health"), Domain::Health);
        assert_eq!(Domain::parse("Self-Worth & Identity"), Domain::SelfWorth);
    }

    #[test]
    fn test_parse_aliases_and_spacing() {
        assert_eq!(Domain::parse("  work "), Domain::WorkCareer);
        assert_eq!(Domain::parse("WORKCAREER"), Domain::WorkCareer);
        assert_eq!(Domain::parse("money"), Domain::FinancialStress);
        assert_eq!(Domain::parse("self worth"), Domain::SelfWorth);
    }

    #[test]
    fn test_unknown_domain_is_preserved() {
        let domain = Domain::parse("Hobbies");
        assert_eq!(domain, Domain::Unknown("Hobbies".to_string()));
        assert!(!domain.is_known());
        assert_eq!(domain.label(), "Hobbies");
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Domain::WorkCareer).unwrap();
        assert_eq!(json, "\"Work & Career\"");
        let back: Domain = serde_json::from_str("\"financial\"").unwrap();
        assert_eq!(back, Domain::FinancialStress);
    }
}
