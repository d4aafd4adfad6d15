//! Rule catalog listing
//!
//! Shows every registered rule, whether it is in the daily pool, and the
//! first terms it produces at the configured length.

use crate::puzzle::DailySelector;
use crate::rules::{Family, RuleError, SequenceRule};
use colored::Colorize;

/// One row of the catalog listing
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub index: usize,
    pub name: &'static str,
    pub family: Family,
    pub description: &'static str,
    pub in_pool: bool,
    pub preview: Result<Vec<i64>, RuleError>,
}

impl RuleEntry {
    fn new(index: usize, rule: &SequenceRule, selector: &DailySelector<'_>) -> Self {
        Self {
            index,
            name: rule.name(),
            family: rule.family(),
            description: rule.description(),
            in_pool: selector.pool().iter().any(|r| r.name() == rule.name()),
            preview: rule.generate(selector.sequence_length()),
        }
    }
}

/// All registered rules in catalog order
#[must_use]
pub fn list_rules(selector: &DailySelector<'_>) -> Vec<RuleEntry> {
    selector
        .registry()
        .all()
        .iter()
        .enumerate()
        .map(|(index, rule)| RuleEntry::new(index, rule, selector))
        .collect()
}

/// A single rule by name
///
/// # Errors
/// Returns `RuleError::NotFound` if no rule has that name.
pub fn describe_rule(selector: &DailySelector<'_>, name: &str) -> Result<RuleEntry, RuleError> {
    let registry = selector.registry();
    let rule = registry.require(name)?;
    let index = registry.index_of(name).unwrap_or_default();
    Ok(RuleEntry::new(index, rule, selector))
}

/// Print the catalog grouped in registry order
pub fn print_rules_listing(entries: &[RuleEntry]) {
    let pooled = entries.iter().filter(|e| e.in_pool).count();

    println!("\n{}", "═".repeat(60).cyan());
    println!(
        "{}",
        format!(" Rule Catalog: {} rules, {pooled} in the daily pool ", entries.len()).bold()
    );
    println!("{}", "═".repeat(60).cyan());

    let mut family = None;
    for entry in entries {
        if family != Some(entry.family) {
            family = Some(entry.family);
            println!("\n  {}", entry.family.to_string().bright_yellow().bold());
        }

        let marker = if entry.in_pool { "●".green() } else { "○".bright_black() };
        let preview = match &entry.preview {
            Ok(terms) => crate::output::formatters::format_sequence(terms),
            Err(e) => e.to_string().red().to_string(),
        };
        println!("    {marker} {:<22} {}", entry.name, preview.bright_black());
    }
    println!();
}

/// Print a single rule in detail
pub fn print_rule_detail(entry: &RuleEntry) {
    println!("\n{} {}", "Rule:".bold(), entry.name.bright_white().bold());
    println!("  Family:      {}", entry.family);
    println!("  Description: {}", entry.description);
    println!("  Catalog #:   {}", entry.index);
    println!(
        "  Daily pool:  {}",
        if entry.in_pool { "yes".green() } else { "no".yellow() }
    );
    match &entry.preview {
        Ok(terms) => println!(
            "  First terms: {}",
            crate::output::formatters::format_sequence(terms)
        ),
        Err(e) => println!("  First terms: {}", e.to_string().red()),
    }
    println!();
}
