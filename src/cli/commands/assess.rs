//! Assess Command
//!
//! Score a single answer.
//!
//! Usage:
//!   stresslens assess --question Q --answer A --domain D [--format json]

use crate::ai::AdvisoryOutcome;
use crate::analysis::QuestionAnalysis;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, print_json};
use crate::types::{Response, Result, SubmittedAnswer};

pub async fn run(question: &str, answer: &str, domain: &str, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load_without_db()?;
    let engine = ctx.engine()?;

    let response = Response::try_from(SubmittedAnswer::new("cli", question, answer, domain))?;
    let analysis = engine.analyzer().analyze(response).await;

    match format {
        OutputFormat::Json => print_json(&analysis),
        OutputFormat::Text => {
            render(&analysis);
            Ok(())
        }
    }
}

fn render(analysis: &QuestionAnalysis) {
    let out = Output::new();
    let assessment = &analysis.assessment;

    out.header(&format!("{} · {}", analysis.response.domain, analysis.response.question_id));
    out.field("Question", &analysis.response.question_text);
    out.field("Answer", &analysis.response.answer_text);
    out.field("Sentiment", format!("{:.2}", assessment.sentiment_score));
    out.field("Confidence", format!("{:.2}", assessment.confidence_score));
    out.field("Emotion", assessment.emotion);
    out.field("Intensity", assessment.intensity);
    out.field(
        "Stressful",
        if assessment.is_stressful { "yes" } else { "no" },
    );
    if !assessment.red_flags.is_empty() {
        out.field("Red flags", join(&assessment.red_flags));
    }
    if !assessment.domain_keywords.is_empty() {
        out.field("Keywords", join(&assessment.domain_keywords));
    }
    out.field(
        "Protocol",
        format!(
            "{} (urgency {})",
            out.protocol(analysis.protocol.protocol),
            analysis.protocol.urgency
        ),
    );

    match &analysis.advisory {
        AdvisoryOutcome::NotRequested => {}
        AdvisoryOutcome::Unavailable { reason } => {
            out.warning(&format!("Advisory check unavailable: {}", reason));
        }
        AdvisoryOutcome::Received {
            assessment: advisory,
            agreement,
        } => {
            out.field(
                "Advisory",
                format!(
                    "{:.2} via {}/{} ({:?})",
                    advisory.stress_score, advisory.provider, advisory.model, agreement
                ),
            );
            if let Some(rationale) = &advisory.rationale {
                out.field("Rationale", rationale);
            }
        }
    }

    out.section("Recommended actions");
    for action in &analysis.protocol.recommended_actions {
        out.bullet(action);
    }
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

