//! Slack Events API webhook.
//!
//! Answers the URL verification handshake and turns plain user messages
//! into single-row updates of the messages tab. Requests are acknowledged
//! before the row is written so Slack sees a reply within its 3 second limit.

use crate::logging::log_error;
use crate::pipeline::Pipeline;
use crate::slack::{ChannelId, Message, MessageTs};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEDUPE_WINDOW: Duration = Duration::from_secs(3600);

#[derive(Clone)]
pub struct EventState {
    pipeline: Arc<Pipeline>,
    /// `channel:ts` of messages already handed to the pipeline
    processed_events: Arc<DashMap<String, Instant>>,
}

impl EventState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            processed_events: Arc::new(DashMap::new()),
        }
    }

    /// Record an event key; false when it was already seen (Slack retries deliveries)
    fn first_delivery(&self, key: &str) -> bool {
        self.cleanup_old_events();
        if self.processed_events.contains_key(key) {
            return false;
        }
        self.processed_events.insert(key.to_string(), Instant::now());
        true
    }

    fn cleanup_old_events(&self) {
        let mut removed = 0;
        self.processed_events.retain(|_key, seen| {
            let keep = seen.elapsed() < DEDUPE_WINDOW;
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            tracing::debug!(removed_count = removed, "Cleaned up old events from cache");
        }
    }

    fn dispatch(&self, channel: ChannelId, message: Message) {
        let key = format!("{}:{}", channel.as_str(), MessageTs::from_epoch(message.ts).as_str());
        if !self.first_delivery(&key) {
            tracing::debug!(event_key = %key, "Duplicate event detected, skipping");
            return;
        }

        let pipeline = self.pipeline.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline.ingest_message(&channel, message).await {
                log_error("ingest_message", &e);
            }
        });
    }
}

pub fn events_router(state: EventState) -> Router {
    Router::new()
        .route("/slack/events", post(handle_events))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventEnvelope {
    UrlVerification {
        challenge: String,
    },
    EventCallback {
        event: InnerEvent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct InnerEvent {
    #[serde(rename = "type")]
    kind: String,
    subtype: Option<String>,
    bot_id: Option<String>,
    channel: Option<String>,
    user: Option<String>,
    text: Option<String>,
    ts: Option<String>,
}

impl InnerEvent {
    /// Plain messages posted by people; edits, joins and bot posts are skipped
    fn into_message(self) -> Option<(ChannelId, Message)> {
        if self.kind != "message" || self.subtype.is_some() || self.bot_id.is_some() {
            return None;
        }
        let ts = MessageTs::new(self.ts?).epoch_secs()?;
        let message = Message::new(ts, self.user?, self.text.unwrap_or_default());
        Some((ChannelId::new(self.channel?), message))
    }
}

async fn handle_events(
    State(state): State<EventState>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            tracing::info!("Answering URL verification");
            (StatusCode::OK, challenge).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            let kind = event.kind.clone();
            match event.into_message() {
                Some((channel, message)) => {
                    tracing::debug!(channel_id = %channel.as_str(), ts = message.ts, "Message event received");
                    state.dispatch(channel, message);
                }
                None => tracing::debug!(event_type = %kind, "Ignoring event"),
            }
            (StatusCode::OK, "OK").into_response()
        }
        EventEnvelope::Other => (StatusCode::OK, "OK").into_response(),
    }
}
