use console::{StyledObject, style};

use crate::types::{Protocol, StressLevel, Trend};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", style(format!("{}:", label)).dim(), value);
    }

    pub fn bullet(&self, message: &str) {
        println!("  • {}", message);
    }

    pub fn protocol(&self, protocol: Protocol) -> StyledObject<&'static str> {
        let label = style(protocol.as_str()).bold();
        match protocol {
            Protocol::Escalate => label.red(),
            Protocol::Monitor => label.yellow(),
            Protocol::Support => label.green(),
        }
    }

    pub fn level(&self, level: StressLevel) -> StyledObject<String> {
        let label = style(level.to_string());
        match level {
            StressLevel::High => label.red(),
            StressLevel::Moderate => label.yellow(),
            StressLevel::Low => label.green(),
        }
    }

    pub fn trend(&self, trend: Trend) -> StyledObject<String> {
        let label = style(trend.to_string());
        match trend {
            Trend::Worsening => label.red(),
            Trend::Improving => label.green(),
            Trend::Stable => label.dim(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
