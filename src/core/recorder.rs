//! Interaction recorder - persists terminal records and serves history reads.
//!
//! Finalization is at-most-once per session identifier: the `session_id`
//! column carries a unique constraint, a pre-insert lookup short-circuits the
//! common duplicate, and a writer that loses the insert race treats the
//! conflict as success and returns the row the winner wrote. Status only ever
//! moves forward, from the in-memory active phase to exactly one terminal
//! state.

use crate::{
    core::{
        screening::{Channel, Screening},
        session::{ActiveSession, CallerInfo, SessionStore, TranscriptTurn},
        summary::{self, CallSummary},
    },
    entities::{Interaction, interaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Terminal status of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionStatus {
    /// The conversation ran to an orderly end
    Completed,
    /// The caller went silent and the session was evicted
    Abandoned,
    /// The caller was routed to voicemail
    Voicemail,
    /// The caller was blocked by screening
    Blocked,
}

impl InteractionStatus {
    /// The storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
            Self::Voicemail => "voicemail",
            Self::Blocked => "blocked",
        }
    }

    /// Parses a stored status, rejecting unknown values.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            "voicemail" => Ok(Self::Voicemail),
            "blocked" => Ok(Self::Blocked),
            other => Err(Error::UnknownVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Everything the recorder needs to write one terminal record.
#[derive(Debug, Clone)]
pub struct InteractionOutcome {
    /// Session identifier, unique per interaction
    pub session_id: String,
    /// The account the interaction belongs to
    pub account_id: i64,
    /// Phone call or web chat
    pub channel: Channel,
    /// Caller identity captured at start
    pub caller: CallerInfo,
    /// Ordered conversation turns
    pub transcript: Vec<TranscriptTurn>,
    /// The screening decision taken at start
    pub screening: Screening,
    /// Derived or externally computed summary
    pub summary: CallSummary,
    /// Sentiment of the caller side, in [-1.0, 1.0]
    pub sentiment_score: Option<f64>,
    /// Total interaction length in seconds
    pub duration_seconds: i32,
    /// Terminal status
    pub status: InteractionStatus,
    /// When the interaction started
    pub started_at: DateTime<Utc>,
}

/// Finds a persisted interaction by its session identifier.
pub async fn find_by_session_id(
    db: &DatabaseConnection,
    session_id: &str,
) -> Result<Option<interaction::Model>> {
    Interaction::find()
        .filter(interaction::Column::SessionId.eq(session_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Persists exactly one terminal record for an interaction.
///
/// Idempotent on the session identifier: if a record already exists the call
/// is a no-op that returns the existing row, and a concurrent duplicate
/// writer that loses the unique-index race is treated the same way rather
/// than surfacing a constraint error.
pub async fn finalize_interaction(
    db: &DatabaseConnection,
    outcome: InteractionOutcome,
) -> Result<interaction::Model> {
    if let Some(existing) = find_by_session_id(db, &outcome.session_id).await? {
        debug!(session_id = %outcome.session_id, "interaction already finalized, no-op");
        return Ok(existing);
    }

    let model = interaction::ActiveModel {
        account_id: Set(outcome.account_id),
        session_id: Set(outcome.session_id.clone()),
        channel: Set(outcome.channel.as_str().to_string()),
        caller_info: Set(crate::core::session::caller_info_to_json(&outcome.caller)),
        transcript: Set(crate::core::session::transcript_to_json(&outcome.transcript)),
        summary: Set(outcome.summary.to_json()),
        sentiment_score: Set(outcome.sentiment_score),
        screening: Set(outcome.screening.to_json()),
        duration_seconds: Set(outcome.duration_seconds),
        status: Set(outcome.status.as_str().to_string()),
        started_at: Set(outcome.started_at),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(inserted) => {
            info!(
                session_id = %outcome.session_id,
                status = outcome.status.as_str(),
                "interaction finalized"
            );
            Ok(inserted)
        }
        Err(insert_err) => {
            // Lost the unique-index race to a concurrent finalize; the row
            // that won is the record.
            if let Some(existing) = find_by_session_id(db, &outcome.session_id).await? {
                debug!(session_id = %outcome.session_id, "concurrent finalize won the race, no-op");
                return Ok(existing);
            }
            Err(insert_err.into())
        }
    }
}

/// Finalizes an active session from the store, deriving the summary,
/// sentiment, and duration from the session itself.
///
/// The session is taken from the store exactly once. Calling again for the
/// same id returns the persisted record (idempotent); an id that is neither
/// active nor persisted is reported as not found.
pub async fn finalize_session(
    db: &DatabaseConnection,
    store: &SessionStore,
    session_id: &str,
    status: InteractionStatus,
) -> Result<interaction::Model> {
    let Some(session) = store.take(session_id) else {
        return match find_by_session_id(db, session_id).await? {
            Some(existing) => Ok(existing),
            None => Err(Error::SessionNotFound {
                session_id: session_id.to_string(),
            }),
        };
    };

    finalize_interaction(db, outcome_from_session(session, status)).await
}

/// Builds a terminal outcome from an active session, deriving summary,
/// sentiment, and duration.
#[must_use]
pub fn outcome_from_session(session: ActiveSession, status: InteractionStatus) -> InteractionOutcome {
    let summary = summary::summarize_transcript(&session.transcript);
    let sentiment = summary::sentiment_score(&session.transcript);
    let duration_seconds = (Utc::now() - session.started_at)
        .num_seconds()
        .max(0)
        .try_into()
        .unwrap_or(i32::MAX);

    InteractionOutcome {
        session_id: session.session_id,
        account_id: session.account_id,
        channel: session.channel,
        caller: session.caller,
        transcript: session.transcript,
        screening: session.screening,
        summary,
        sentiment_score: Some(sentiment),
        duration_seconds,
        status,
        started_at: session.started_at,
    }
}

/// Retrieves interactions for an account, most recent first, optionally
/// limited to those started at or after `since`.
pub async fn get_interactions_for_account(
    db: &DatabaseConnection,
    account_id: i64,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<interaction::Model>> {
    let mut query = Interaction::find()
        .filter(interaction::Column::AccountId.eq(account_id))
        .order_by_desc(interaction::Column::StartedAt);
    if let Some(since) = since {
        query = query.filter(interaction::Column::StartedAt.gte(since));
    }
    query.all(db).await.map_err(Into::into)
}
