//! Checkin Command
//!
//! Process a full check-in submission from a JSON or YAML file.
//!
//! Usage:
//!   stresslens checkin answers.yaml --user U [--format json] [--no-save]

use std::path::Path;

use crate::analysis::CheckinReport;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, print_json};
use crate::types::{Result, SubmittedAnswer, UserId};

pub async fn run(file: &Path, user: &str, format: OutputFormat, no_save: bool) -> Result<()> {
    let answers = read_answers(file)?;

    let ctx = if no_save {
        CommandContext::load_without_db()?
    } else {
        CommandContext::load()?
    };
    let engine = ctx.engine()?;

    let report = engine.process(&UserId::from(user), answers).await?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            render(&report, no_save);
            Ok(())
        }
    }
}

/// YAML for `.yaml`/`.yml`, JSON otherwise
pub fn read_answers(file: &Path) -> Result<Vec<SubmittedAnswer>> {
    let content = std::fs::read_to_string(file)?;
    let is_yaml = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

fn render(report: &CheckinReport, no_save: bool) {
    let out = Output::new();

    out.header(&format!("Check-in for {}", report.user_id));
    out.field("Answers", report.answers.len());
    out.field("Protocol", out.protocol(report.overall_protocol()));
    out.field("Trend", out.trend(report.overall_trend));

    for domain in &report.domains {
        let summary = &domain.summary;
        out.section(domain.domain.label());
        out.field(
            "Level",
            format!(
                "{} (average {:.2})",
                out.level(summary.overall_stress_level),
                summary.average_sentiment_score
            ),
        );
        out.field(
            "Stressful",
            format!("{}/{}", summary.high_stress_count, summary.total_answers),
        );
        out.field("Protocol", out.protocol(summary.mcp_protocol));
        if let Some(trend) = &domain.trend {
            out.field(
                "Trend",
                format!(
                    "{} ({:+.2} over {} check-ins)",
                    out.trend(trend.trend),
                    trend.average_delta,
                    trend.checkin_count
                ),
            );
        }

        for answer in &summary.individual_results {
            let marker = if answer.assessment.is_flagged { "!" } else { " " };
            println!(
                "  {} {:<10} {:.2}  {}",
                marker,
                answer.response.question_id,
                answer.assessment.sentiment_score,
                out.protocol(answer.protocol.protocol)
            );
        }

        if domain.deep_dive.needs_deep_dive {
            out.warning(&format!(
                "Deep dive recommended ({} priority, {} flagged)",
                domain.deep_dive.priority,
                domain.deep_dive.flagged_questions.len()
            ));
        }

        for recommendation in &domain.recommendations {
            out.bullet(recommendation);
        }
    }

    let unavailable = report
        .answers
        .iter()
        .filter(|a| matches!(a.advisory, crate::ai::AdvisoryOutcome::Unavailable { .. }))
        .count();
    if unavailable > 0 {
        out.warning(&format!(
            "Advisory check unavailable for {} answer(s); heuristic results shown",
            unavailable
        ));
    }

    if no_save {
        out.info("Not saved (--no-save)");
    } else {
        out.success("Check-in saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_answers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(
            &path,
            r#"[{"questionId":"q1","questionText":"How often?","answerText":"Rarely","domain":"work"}]"#,
        )
        .unwrap();

        let answers = read_answers(&path).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer_text.as_deref(), Some("Rarely"));
    }

    #[test]
    fn test_read_yaml_answers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.yml");
        fs::write(
            &path,
            "- questionId: q1\n  questionText: How often?\n  answerText: Very often\n  domain: Health\n\
             - questionId: q2\n  answerText: Rarely\n  domain: money\n",
        )
        .unwrap();

        let answers = read_answers(&path).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[1].domain.as_deref(), Some("money"));
        assert!(answers[1].question_text.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "{not json").unwrap();
        assert!(read_answers(&path).is_err());
    }
}
