//! Recommendation text for one domain summary.

use crate::constants::recommendations::{
    HIGH_SEVERITY_AVERAGE, MAX_FLAGGED_REFERENCES, MAX_RECOMMENDATIONS, MODERATE_SEVERITY_AVERAGE,
};
use crate::types::{BatchSummary, Domain};

const HIGH_SEVERITY: &[&str] = &[
    "Consider speaking with a licensed mental health professional soon",
    "Reduce non-essential commitments for the next two weeks",
    "Tell someone you trust how heavy things feel right now",
];

const MODERATE_SEVERITY: &[&str] = &[
    "Schedule a short daily decompression routine",
    "Revisit this check-in in one week to see how things are moving",
];

const LOW_SEVERITY: &[&str] = &["Keep the habits that are working for you"];

const WORK: [&str; 5] = [
    "Set clear start and stop times for your workday",
    "Discuss workload priorities with your manager",
    "Block focus time and protect it from meetings",
    "Take your full lunch break away from your desk",
    "Use any employee assistance program your workplace offers",
];

const PERSONAL: [&str; 5] = [
    "Plan one unhurried activity with someone close to you",
    "Name one boundary you need and communicate it calmly",
    "Spend a little time each week on something just for you",
    "Reconnect with a friend you have not spoken to in a while",
    "Consider couples or family counselling if conflict keeps repeating",
];

const FINANCIAL: [&str; 5] = [
    "List every fixed monthly cost in one place",
    "Build a simple weekly spending plan",
    "Contact creditors early about payment options",
    "Look into free non-profit credit counselling",
    "Set aside even a small automatic savings amount",
];

const HEALTH: [&str; 5] = [
    "Keep a consistent sleep and wake time",
    "Add a short walk or stretch to each day",
    "Book a routine check-up if one is overdue",
    "Limit caffeine and alcohol late in the day",
    "Eat regular meals even on busy days",
];

const SELF_WORTH: [&str; 5] = [
    "Write down three things you handled well this week",
    "Notice harsh self-talk and reword it as you would for a friend",
    "Limit time on feeds that leave you comparing yourself",
    "Spend time with people who value you as you are",
    "Set one small goal you can finish this week",
];

const GENERAL: [&str; 5] = [
    "Keep a regular daily routine",
    "Take short breaks to breathe and reset",
    "Stay connected with people you trust",
    "Move your body a little every day",
    "Reach out for support when things feel heavy",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationGenerator;

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Severity items, then flagged-question references, then domain tips
    pub fn generate(&self, summary: &BatchSummary, domain: &Domain) -> Vec<String> {
        let average = summary.average_sentiment_score;
        let severity = if average > HIGH_SEVERITY_AVERAGE {
            HIGH_SEVERITY
        } else if average > MODERATE_SEVERITY_AVERAGE {
            MODERATE_SEVERITY
        } else {
            LOW_SEVERITY
        };

        let mut flagged: Vec<_> = summary.stressful_answers().collect();
        flagged.sort_by(|a, b| {
            b.assessment
                .sentiment_score
                .total_cmp(&a.assessment.sentiment_score)
        });
        let references = flagged
            .into_iter()
            .filter(|a| !a.response.question_text.trim().is_empty())
            .take(MAX_FLAGGED_REFERENCES)
            .map(|a| format!("Reflect further on: \"{}\"", a.response.question_text.trim()));

        severity
            .iter()
            .map(|s| s.to_string())
            .chain(references)
            .chain(Self::domain_table(domain).iter().map(|s| s.to_string()))
            .take(MAX_RECOMMENDATIONS)
            .collect()
    }

    fn domain_table(domain: &Domain) -> &'static [&'static str; 5] {
        match domain {
            Domain::WorkCareer => &WORK,
            Domain::PersonalLife => &PERSONAL,
            Domain::FinancialStress => &FINANCIAL,
            Domain::Health => &HEALTH,
            Domain::SelfWorth => &SELF_WORTH,
            Domain::Unknown(_) => &GENERAL,
        }
    }
}
