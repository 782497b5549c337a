//! Environment-variable reconciler
//!
//! Values are never stored in the manifest: each declared name is prompted
//! for, and a blank answer keeps whatever is already set.

use anyhow::Result;

use super::{Outcome, StepReport};
use crate::tools::{EnvStore, Prompter};
use crate::ui;

pub struct EnvVarReconciler<'a> {
    store: &'a dyn EnvStore,
    prompter: &'a dyn Prompter,
}

impl<'a> EnvVarReconciler<'a> {
    pub fn new(store: &'a dyn EnvStore, prompter: &'a dyn Prompter) -> Self {
        Self { store, prompter }
    }

    pub fn reconcile(&self, names: &[String], report: &mut StepReport) {
        if names.is_empty() {
            ui::info("No environment variables declared");
            return;
        }

        for name in names {
            let outcome = match self.reconcile_one(name) {
                Ok(outcome) => outcome,
                Err(e) => {
                    ui::warn(&format!("Failed to set {name}: {e:#}"));
                    Outcome::failed(&e)
                }
            };
            report.record(name, outcome);
        }
    }

    fn reconcile_one(&self, name: &str) -> Result<Outcome> {
        // Values are often secrets; only say whether one exists
        let state = if self.store.get(name).is_some() { "set" } else { "not set" };
        ui::kv(name, state);

        let answer = self
            .prompter
            .ask(&format!("Value for {name} (leave blank to keep current)"))?;
        let value = answer.trim();

        if value.is_empty() {
            ui::dim(&format!("Using existing value for {name}"));
            return Ok(Outcome::Kept);
        }

        self.store.set_user(name, value)?;
        ui::success(&format!("Set {name}"));
        Ok(Outcome::Set)
    }
}
