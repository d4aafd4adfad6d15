//! Command implementations

pub mod distribution;
pub mod rules;
pub mod simple;

pub use distribution::{DistributionResult, print_distribution, run_distribution};
pub use rules::{RuleEntry, describe_rule, list_rules, print_rule_detail, print_rules_listing};
pub use simple::run_simple;
