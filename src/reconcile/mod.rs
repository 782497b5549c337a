//! Reconcilers: converge observed local state toward the manifest
//!
//! Each reconciler compares declared state with what is observed right now
//! and performs the smallest action that converges them (install vs. update,
//! clone vs. pull, set vs. keep). Failures are caught per item, recorded in
//! the step's [`StepReport`] and never stop the remaining items.

pub mod buckets;
pub mod env_vars;
pub mod language_servers;
pub mod packages;
pub mod repositories;
pub mod scoop;
pub mod urls;

pub use buckets::BucketReconciler;
pub use env_vars::EnvVarReconciler;
pub use language_servers::LanguageServerReconciler;
pub use packages::{PackageReconciler, PackageSource};
pub use repositories::RepositoryReconciler;
pub use scoop::ScoopBootstrap;
pub use urls::UrlReconciler;

use colored::Colorize;
use std::fmt;

use crate::error::StepError;
use crate::plan::Step;
use crate::ui;

/// What happened to a single declared item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    Updated,
    Cloned,
    Pulled,
    Added,
    Set,
    Launched,
    /// Already in the desired state; nothing done
    Kept,
    Skipped { reason: String },
    Failed { error: String },
}

impl Outcome {
    pub fn failed(err: &anyhow::Error) -> Self {
        Self::Failed {
            error: format!("{err:#}"),
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Installed | Self::Updated | Self::Cloned | Self::Pulled | Self::Added | Self::Set
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed => write!(f, "installed"),
            Self::Updated => write!(f, "updated"),
            Self::Cloned => write!(f, "cloned"),
            Self::Pulled => write!(f, "pulled"),
            Self::Added => write!(f, "added"),
            Self::Set => write!(f, "set"),
            Self::Launched => write!(f, "launched"),
            Self::Kept => write!(f, "unchanged"),
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

#[derive(Debug)]
pub struct ItemOutcome {
    pub name: String,
    pub outcome: Outcome,
}

/// Everything that happened while running one step
#[derive(Debug)]
pub struct StepReport {
    pub step: Step,
    pub items: Vec<ItemOutcome>,
    pub errors: Vec<StepError>,
}

impl StepReport {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        let name = name.into();
        log::debug!("{}: {name} -> {outcome}", self.step.name());
        self.items.push(ItemOutcome { name, outcome });
    }

    /// Record a failure that stopped the step (or one batch of it).
    pub fn abort(&mut self, err: StepError) {
        ui::error(&format!("{}: {err}", self.step.description()));
        self.errors.push(err);
    }

    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.items
            .iter()
            .find(|i| i.name == name)
            .map(|i| &i.outcome)
    }

    pub fn changed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_change()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_failure()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.items.len() - self.changed() - self.failed()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.failed() == 0
    }

    /// One summary line for the end-of-run table
    pub fn print_summary(&self) {
        let status = if self.is_success() {
            "✓".green()
        } else {
            "✗".red()
        };
        let mut line = format!(
            "{} changed, {} unchanged, {} failed",
            self.changed(),
            self.unchanged(),
            self.failed()
        );
        if !self.errors.is_empty() {
            line.push_str(&format!(", {} aborted", self.errors.len()));
        }
        println!("  {} {:<26} {}", status, self.step.name().bold(), line.dimmed());
    }
}

/// Apply an optional name filter to declared items.
///
/// Returns the selected items in declaration order. When a filter is given
/// but matches nothing, returns every declared name instead so the caller can
/// list what is available. Names are compared case-insensitively.
pub fn select_by_name<'a, T>(
    items: &'a [T],
    filter: Option<&[String]>,
    name_of: impl Fn(&T) -> &str,
) -> Result<Vec<&'a T>, Vec<String>> {
    let Some(filter) = filter.filter(|f| !f.is_empty()) else {
        return Ok(items.iter().collect());
    };

    let is_wanted = |name: &str| filter.iter().any(|f| f.eq_ignore_ascii_case(name));
    let selected: Vec<&T> = items.iter().filter(|i| is_wanted(name_of(*i))).collect();

    if selected.is_empty() {
        return Err(items.iter().map(|i| name_of(i).to_string()).collect());
    }

    for wanted in filter {
        if !items.iter().any(|i| name_of(i).eq_ignore_ascii_case(wanted)) {
            ui::warn(&format!("'{wanted}' is not declared in the manifest"));
        }
    }

    Ok(selected)
}

/// Tell the user a filter matched nothing.
pub fn report_no_match(kind: &str, filter: Option<&[String]>, available: &[String]) {
    ui::warn(&format!(
        "No {kind} matched: {}",
        filter.map(|f| f.join(", ")).unwrap_or_default()
    ));
    if available.is_empty() {
        ui::info(&format!("No {kind} are declared in the manifest"));
    } else {
        ui::info(&format!("Available {kind}: {}", available.join(", ")));
    }
}
