use std::fmt;
use toaster_index::BuildSummary;
use toaster_types::{BuildOutcome, format_short_date};

/// Recent builds, one per line.
pub struct RecentBuildsView<'a> {
    builds: &'a [BuildSummary],
}

impl<'a> RecentBuildsView<'a> {
    pub fn new(builds: &'a [BuildSummary]) -> Self {
        Self { builds }
    }
}

impl fmt::Display for RecentBuildsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.builds.is_empty() {
            return writeln!(f, "No builds yet.");
        }

        for summary in self.builds {
            let build = &summary.build;
            let when = match build.outcome {
                BuildOutcome::InProgress => {
                    format!("started {}", format_short_date(&build.started_on))
                }
                _ => format!("completed {}", format_short_date(&build.completed_on)),
            };
            writeln!(
                f,
                "#{:<5} {:<12} {:<24} {:<20} {}",
                build.id.get(),
                build.outcome.to_string(),
                summary.target_labels.join(" "),
                summary.project_name,
                when
            )?;
        }
        Ok(())
    }
}
