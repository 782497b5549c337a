//! Bucket reconciler: registers the non-default scoop buckets that declared
//! packages come from.

use pkgkit::Backend;

use super::{Outcome, StepReport};
use crate::error::StepError;
use crate::manifest::PackageSpec;
use crate::ui;

pub struct BucketReconciler<'a> {
    backend: &'a dyn Backend,
}

impl<'a> BucketReconciler<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub fn reconcile(&self, specs: &[PackageSpec], report: &mut StepReport) {
        let wanted = required_buckets(specs);
        if wanted.is_empty() {
            ui::info("No extra buckets referenced by the manifest");
            return;
        }

        if !self.backend.is_available() {
            report.abort(StepError::tool_not_available(self.backend.tool()));
            return;
        }

        let known = match self.backend.list_buckets() {
            Ok(known) => known,
            Err(e) => {
                report.abort(e.into());
                return;
            }
        };

        for bucket in wanted {
            if known.iter().any(|k| k.eq_ignore_ascii_case(&bucket)) {
                ui::dim(&format!("Bucket {bucket} already added"));
                report.record(bucket, Outcome::Kept);
                continue;
            }

            ui::info(&format!("Adding bucket {bucket}..."));
            let outcome = match self.backend.add_bucket(&bucket) {
                Ok(()) => {
                    ui::success(&format!("Added bucket {bucket}"));
                    Outcome::Added
                }
                Err(e) => {
                    ui::warn(&format!("Failed to add bucket {bucket}: {e}"));
                    ui::dim(e.category().advice());
                    Outcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.record(bucket, outcome);
        }
    }
}

/// Distinct non-default buckets, in first-seen order, compared case-insensitively.
fn required_buckets(specs: &[PackageSpec]) -> Vec<String> {
    let mut buckets: Vec<String> = Vec::new();
    for spec in specs {
        let package = spec.to_package();
        if let Some(bucket) = package.custom_bucket()
            && !buckets.iter().any(|b| b.eq_ignore_ascii_case(bucket))
        {
            buckets.push(bucket.to_string());
        }
    }
    buckets
}
