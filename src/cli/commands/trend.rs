//! Trend Command
//!
//! Compare a user's latest check-in against the previous one, per domain.
//!
//! Usage:
//!   stresslens trend --user U [--domain D] [--format json]

use serde_json::json;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, print_json};
use crate::types::{Domain, Result, UserId};

pub fn run(user: &str, domain: Option<&str>, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load()?;
    let engine = ctx.engine()?;

    let user_id = UserId::from(user);
    let domain = domain.map(Domain::parse);
    let records = engine.trends_for(&user_id, domain.as_ref())?;
    let overall = engine.overall_trend(&records);

    if format == OutputFormat::Json {
        return print_json(&json!({
            "userId": user_id.as_str(),
            "overallTrend": overall,
            "domains": records,
        }));
    }

    let out = Output::new();
    out.header(&format!("Trends for {}", user_id));

    if records.is_empty() {
        out.info("Not enough history yet (two check-ins per domain are needed)");
        return Ok(());
    }

    for record in &records {
        out.section(record.domain.label());
        out.field(
            "Trend",
            format!("{} ({:+.2})", out.trend(record.trend), record.average_delta),
        );
        out.field("Level", out.level(record.current_level));
        let protocol = out.protocol(record.current_protocol);
        if record.protocol_changed {
            out.field("Protocol", format!("{} (changed)", protocol));
        } else {
            out.field("Protocol", protocol);
        }
        out.field("Check-ins", record.checkin_count);
    }

    println!();
    out.field("Overall", out.trend(overall));
    Ok(())
}
