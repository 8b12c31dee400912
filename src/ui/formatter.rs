//! Formatting functions for terminal output.
//!
//! The `format_*` functions build strings (testable); the `display_*`
//! functions print them. Styling goes through `console`, which drops colors
//! when the stream is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::PrefixRule;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Shows either "From: old -> To: new" or, for a first release, "Initial Tag: new".
pub fn format_proposed_tag(old_tag: Option<&str>, new_tag: &str) -> String {
    match old_tag {
        Some(old) => format!(
            "{}\n  From: {}\n  To:   {}",
            style("Tag Change:").bold(),
            style(old).red(),
            style(new_tag).green()
        ),
        None => format!(
            "{}\n  New tag: {}",
            style("Initial Tag:").bold(),
            style(new_tag).green()
        ),
    }
}

pub fn display_proposed_tag(old_tag: Option<&str>, new_tag: &str) {
    println!("\n{}", format_proposed_tag(old_tag, new_tag));
}

/// One line per rule, in match order
pub fn format_rules(rules: &[PrefixRule]) -> String {
    let width = rules.iter().map(|r| r.prefix.len()).max().unwrap_or(0);

    let mut out = style("Branch rules (first match wins):").bold().to_string();
    for (i, rule) in rules.iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {:<width$}  -> {}",
            i + 1,
            rule.prefix,
            rule.category,
            width = width
        ));
    }
    out
}

pub fn display_rules(rules: &[PrefixRule]) {
    println!("{}", format_rules(rules));
}

/// Display manual push instruction for a tag created locally.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} refs/tags/{}", remote, tag)).cyan()
    );
}
