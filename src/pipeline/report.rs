use crate::digest::Digest;
use crate::sheets::WriteTally;
use std::fmt;
use std::process::ExitCode;

/// What happened to one configured channel during a digest run
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOutcome {
    Summarized { messages: usize },
    NotFound,
    NotMember,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub channel: String,
    pub outcome: ChannelOutcome,
    pub digest: Option<Digest>,
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ChannelOutcome::Summarized { messages } => {
                write!(f, "#{} summarized ({} messages)", self.channel, messages)
            }
            ChannelOutcome::NotFound => write!(f, "#{} not found", self.channel),
            ChannelOutcome::NotMember => write!(
                f,
                "#{} is not accessible, invite the bot with /invite",
                self.channel
            ),
            ChannelOutcome::Failed(reason) => write!(f, "#{} failed: {}", self.channel, reason),
        }
    }
}

/// Per-channel outcomes and the sheet write tally of one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub run_id: String,
    pub channels: Vec<ChannelReport>,
    pub writes: WriteTally,
    /// Set when the sheet could not be read or prepared, so no rows were attempted
    pub write_error: Option<String>,
}

impl RunReport {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            ..Default::default()
        }
    }

    pub fn digests(&self) -> impl Iterator<Item = &Digest> {
        self.channels.iter().filter_map(|c| c.digest.as_ref())
    }

    pub fn summarized(&self) -> usize {
        self.channels
            .iter()
            .filter(|c| matches!(c.outcome, ChannelOutcome::Summarized { .. }))
            .count()
    }

    /// Every channel summarized and every row written
    pub fn is_success(&self) -> bool {
        self.summarized() == self.channels.len()
            && self.write_error.is_none()
            && self.writes.is_success()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    pub fn log_summary(&self) {
        for channel in &self.channels {
            match channel.outcome {
                ChannelOutcome::Summarized { .. } => {
                    tracing::info!(run_id = %self.run_id, "{}", channel)
                }
                _ => tracing::warn!(run_id = %self.run_id, "{}", channel),
            }
        }

        for failure in &self.writes.failures {
            tracing::warn!(
                run_id = %self.run_id,
                key = %failure.key,
                operation = %failure.operation,
                error = %failure.error,
                "Row write failed"
            );
        }

        tracing::info!(
            run_id = %self.run_id,
            channels = self.channels.len(),
            summarized = self.summarized(),
            rows_updated = self.writes.updated,
            rows_appended = self.writes.appended,
            rows_failed = self.writes.failures.len(),
            write_error = ?self.write_error,
            success = self.is_success(),
            "Digest run complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::{RowFailure, StoreError, WriteOperation};

    fn report(outcomes: Vec<ChannelOutcome>) -> RunReport {
        let mut report = RunReport::new("run-1");
        report.channels = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| ChannelReport {
                channel: format!("ch{}", i),
                outcome,
                digest: None,
            })
            .collect();
        report
    }

    #[test]
    fn test_outcome_messages() {
        let report = report(vec![
            ChannelOutcome::Summarized { messages: 3 },
            ChannelOutcome::NotFound,
            ChannelOutcome::NotMember,
        ]);
        assert_eq!(report.channels[0].to_string(), "#ch0 summarized (3 messages)");
        assert_eq!(report.channels[1].to_string(), "#ch1 not found");
        assert!(report.channels[2].to_string().contains("/invite"));
    }

    #[test]
    fn test_success_requires_every_channel_and_row() {
        let ok = report(vec![ChannelOutcome::Summarized { messages: 1 }]);
        assert!(ok.is_success());

        let missing = report(vec![
            ChannelOutcome::Summarized { messages: 1 },
            ChannelOutcome::NotFound,
        ]);
        assert!(!missing.is_success());

        let mut failed_row = report(vec![ChannelOutcome::Summarized { messages: 1 }]);
        failed_row.writes.failures.push(RowFailure {
            key: "#ch0".to_string(),
            operation: WriteOperation::Update,
            error: StoreError::Transport("timeout".to_string()),
        });
        assert!(!failed_row.is_success());
    }
}
