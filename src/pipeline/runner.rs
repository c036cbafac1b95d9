use crate::config::{DigestConfig, Settings, SheetsConfig};
use crate::digest::{DigestBuilder, mention_ids};
use crate::error::Result;
use crate::logging::{Timer, log_error};
use crate::metadata::{ChannelInfo, UserDirectory};
use crate::pipeline::report::{ChannelOutcome, ChannelReport, RunReport};
use crate::pipeline::rows::{DIGEST_HEADER, MESSAGE_ROW_WIDTH, digest_row, message_rows};
use crate::sheets::{
    StoreError, TableRegion, TableRow, TabularStore, WriteTally, anchor_region, locate_header,
    sync_rows,
};
use crate::slack::{
    ChannelId, ChannelResolver, ConversationSource, FetchWindow, Message, MessageFetcher,
    ResolveError, SourceError, channel_link,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Wires the conversation source to the tabular store.
///
/// Every run builds its own user directory and channel resolver, so nothing
/// cached in one run leaks into the next.
pub struct Pipeline {
    source: Arc<dyn ConversationSource>,
    store: Arc<dyn TabularStore>,
    sheets: SheetsConfig,
    digest: DigestConfig,
    team_id: Option<String>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn ConversationSource>,
        store: Arc<dyn TabularStore>,
        settings: &Settings,
    ) -> Self {
        Self {
            source,
            store,
            sheets: settings.sheets.clone(),
            digest: settings.digest.clone(),
            team_id: settings.slack.team_id.clone(),
        }
    }

    pub fn digest_region(&self) -> TableRegion {
        TableRegion::new(
            &self.sheets.spreadsheet_id,
            &self.sheets.digest_tab,
            DIGEST_HEADER.len(),
        )
    }

    pub fn messages_region(&self) -> TableRegion {
        TableRegion::new(
            &self.sheets.spreadsheet_id,
            &self.sheets.messages_tab,
            MESSAGE_ROW_WIDTH,
        )
    }

    pub async fn run_digests(&self) -> RunReport {
        self.run_digests_at(Utc::now()).await
    }

    /// Summarize every configured channel and reconcile one row per channel.
    ///
    /// Channel failures are recorded in the report and never stop the run.
    pub async fn run_digests_at(&self, now: DateTime<Utc>) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("digest_run", run_id = %run_id);
        self.digest_run(run_id, now).instrument(span).await
    }

    async fn digest_run(&self, run_id: String, now: DateTime<Utc>) -> RunReport {
        let _timer = Timer::new("digest_run");
        tracing::info!(
            channels = self.digest.channels.len(),
            hours_back = self.digest.hours_back,
            "Starting digest run"
        );

        let directory = UserDirectory::new(self.source.clone());
        let resolver = ChannelResolver::new(self.source.clone());
        let fetcher = MessageFetcher::new(self.source.clone());
        let builder = DigestBuilder::new(
            &directory,
            format!("Last {} hours", self.digest.hours_back),
        );
        let window = FetchWindow::last_hours(self.digest.hours_back, self.digest.message_limit, now);

        let mut report = RunReport::new(run_id);
        for name in &self.digest.channels {
            let channel = name.trim_start_matches('#');
            let outcome = self
                .summarize_channel(channel, &resolver, &fetcher, &builder, &window, now)
                .await;
            report.channels.push(outcome);
        }

        let rows: Vec<TableRow> = report.digests().map(digest_row).collect();
        if !rows.is_empty() {
            match self.write_rows(self.digest_region(), &DIGEST_HEADER, rows).await {
                Ok(tally) => report.writes = tally,
                Err(e) => {
                    log_error("write_digest_rows", &e);
                    report.write_error = Some(e.to_string());
                }
            }
        }

        directory.log_stats().await;
        report.log_summary();
        report
    }

    async fn summarize_channel(
        &self,
        channel: &str,
        resolver: &ChannelResolver,
        fetcher: &MessageFetcher,
        builder: &DigestBuilder<'_>,
        window: &FetchWindow,
        now: DateTime<Utc>,
    ) -> ChannelReport {
        let failed = |outcome| ChannelReport {
            channel: channel.to_string(),
            outcome,
            digest: None,
        };

        let channel_id = match resolver.resolve(channel).await {
            Ok(id) => id,
            Err(ResolveError::NotFound(_)) => return failed(ChannelOutcome::NotFound),
            Err(e) => {
                log_error("resolve_channel", &e);
                return failed(ChannelOutcome::Failed(e.to_string()));
            }
        };

        let messages = match fetcher.fetch(&channel_id, window).await {
            Ok(messages) => messages,
            Err(SourceError::NotMember) => return failed(ChannelOutcome::NotMember),
            Err(SourceError::NotFound) => return failed(ChannelOutcome::NotFound),
            Err(e) => return failed(ChannelOutcome::Failed(e.to_string())),
        };

        let digest = builder.build_at(channel, &messages, now).await;
        tracing::info!(
            channel = %channel,
            messages = digest.message_count,
            activity = %digest.activity_level,
            "Channel summarized"
        );

        ChannelReport {
            channel: channel.to_string(),
            outcome: ChannelOutcome::Summarized {
                messages: digest.message_count,
            },
            digest: Some(digest),
        }
    }

    /// Blank every digest row below the header, wherever the header sits
    pub async fn reset_digests(&self) -> Result<()> {
        let mut region = self.digest_region();
        if let Some(row) = locate_header(self.store.as_ref(), &region, DIGEST_HEADER[0]).await? {
            region = region.with_header_at(row);
        }
        self.store.clear_range(&region, &region.data_range()).await?;
        tracing::info!(
            tab = %region.tab_name,
            first_row = region.first_data_row,
            "Cleared digest rows"
        );
        Ok(())
    }

    /// Reconcile the latest messages of `channel` into the messages tab, one
    /// row per message keyed by its posting time
    pub async fn sync_channel_messages(&self, channel: &str) -> Result<WriteTally> {
        let _timer = Timer::new("sync_channel_messages");
        let channel = channel.trim_start_matches('#');

        let channel_id = ChannelResolver::new(self.source.clone())
            .resolve(channel)
            .await?;
        let messages = MessageFetcher::new(self.source.clone())
            .fetch(
                &channel_id,
                &FetchWindow::Latest(self.digest.sync_message_count),
            )
            .await?;

        if messages.is_empty() {
            tracing::info!(channel = %channel, "No messages to sync");
            return Ok(WriteTally::default());
        }

        let directory = UserDirectory::new(self.source.clone());
        directory.resolve_workspace_map().await;
        let names = names_for(&directory, &messages).await;

        let tally = self.write_messages(&channel_id, &messages, &names).await?;
        tracing::info!(
            channel = %channel,
            updated = tally.updated,
            appended = tally.appended,
            failed = tally.failures.len(),
            "Synced channel messages"
        );
        Ok(tally)
    }

    /// Single-message row update for one inbound event
    pub async fn ingest_message(&self, channel_id: &ChannelId, message: Message) -> Result<WriteTally> {
        let directory = UserDirectory::new(self.source.clone());
        let messages = [message];
        let names = names_for(&directory, &messages).await;
        let tally = self.write_messages(channel_id, &messages, &names).await?;
        tracing::info!(
            channel_id = %channel_id.as_str(),
            updated = tally.updated,
            appended = tally.appended,
            "Ingested message"
        );
        Ok(tally)
    }

    /// Every channel visible to the bot, with membership
    pub async fn list_channels(&self) -> Result<Vec<ChannelInfo>> {
        let channels = ChannelResolver::new(self.source.clone())
            .all_channels()
            .await?;
        Ok(channels)
    }

    async fn write_messages(
        &self,
        channel_id: &ChannelId,
        messages: &[Message],
        names: &HashMap<String, String>,
    ) -> std::result::Result<WriteTally, StoreError> {
        let link = channel_link(self.team_id.as_deref(), channel_id);
        let rows = message_rows(messages, names, Utc::now(), link.as_deref());
        let header = [self.sheets.messages_header.as_str()];
        self.write_rows(self.messages_region(), &header, rows).await
    }

    async fn write_rows(
        &self,
        region: TableRegion,
        header: &[&str],
        rows: Vec<TableRow>,
    ) -> std::result::Result<WriteTally, StoreError> {
        let region = anchor_region(self.store.as_ref(), region, header).await?;
        sync_rows(self.store.as_ref(), &region, rows).await
    }
}

/// Display names for every author and mention in `messages`
async fn names_for(directory: &UserDirectory, messages: &[Message]) -> HashMap<String, String> {
    let mut ids: Vec<String> = Vec::new();
    for message in messages {
        if !message.is_system {
            ids.push(message.author_id.clone());
        }
        ids.extend(mention_ids(&message.body).map(str::to_string));
    }

    directory
        .resolve_many(&ids)
        .await
        .into_iter()
        .map(|user| (user.id, user.display_name))
        .collect()
}
