//! Call analytics - aggregation over persisted interactions.
//!
//! Everything here is a pure recomputation over the interaction history, so
//! re-running an aggregation for any account or day is always safe and needs
//! no coordination with concurrent screening or finalization.

use crate::{
    core::{recorder, summary::CallSummary},
    entities::interaction,
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;

/// Aggregated call statistics for one account over a time window.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStatistics {
    /// Number of interactions in the window
    pub total_calls: usize,
    /// Mean duration in seconds, 0.0 when there are no calls
    pub avg_duration: f64,
    /// Mean sentiment over interactions that have a score, 0.0 when none do
    pub avg_sentiment: f64,
    /// Number of interactions where a message was taken
    pub messages_taken: usize,
}

/// One day's worth of aggregated statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatistics {
    /// The day (by interaction start, UTC)
    pub date: NaiveDate,
    /// Statistics for that day
    pub stats: CallStatistics,
}

fn aggregate(interactions: &[interaction::Model]) -> CallStatistics {
    let total_calls = interactions.len();

    let total_duration: i64 = interactions
        .iter()
        .map(|call| i64::from(call.duration_seconds))
        .sum();

    let sentiments: Vec<f64> = interactions
        .iter()
        .filter_map(|call| call.sentiment_score)
        .collect();

    let messages_taken = interactions
        .iter()
        .filter(|call| {
            CallSummary::from_json(&call.summary).is_some_and(|summary| summary.message_taken)
        })
        .count();

    #[allow(clippy::cast_precision_loss)]
    let avg_duration = if total_calls == 0 {
        0.0
    } else {
        total_duration as f64 / total_calls as f64
    };

    #[allow(clippy::cast_precision_loss)]
    let avg_sentiment = if sentiments.is_empty() {
        0.0
    } else {
        sentiments.iter().sum::<f64>() / sentiments.len() as f64
    };

    CallStatistics {
        total_calls,
        avg_duration,
        avg_sentiment,
        messages_taken,
    }
}

/// Computes aggregate call statistics for an account, optionally limited to
/// interactions started at or after `since`.
pub async fn call_statistics(
    db: &DatabaseConnection,
    account_id: i64,
    since: Option<DateTime<Utc>>,
) -> Result<CallStatistics> {
    let interactions = recorder::get_interactions_for_account(db, account_id, since).await?;
    Ok(aggregate(&interactions))
}

/// Computes a per-day breakdown for an account, keyed by the interaction's
/// start date in UTC and sorted ascending.
pub async fn daily_breakdown(
    db: &DatabaseConnection,
    account_id: i64,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<DailyStatistics>> {
    let interactions = recorder::get_interactions_for_account(db, account_id, since).await?;

    let mut by_day: BTreeMap<NaiveDate, Vec<interaction::Model>> = BTreeMap::new();
    for call in interactions {
        by_day.entry(call.started_at.date_naive()).or_default().push(call);
    }

    Ok(by_day
        .into_iter()
        .map(|(date, calls)| DailyStatistics {
            date,
            stats: aggregate(&calls),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::recorder::{InteractionStatus, finalize_interaction};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_statistics_empty_account() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        let stats = call_statistics(&db, account.id, None).await?;
        assert_eq!(stats.total_calls, 0);
        assert_eq!(stats.avg_duration, 0.0);
        assert_eq!(stats.avg_sentiment, 0.0);
        assert_eq!(stats.messages_taken, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_aggregation() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        let mut first = sample_outcome(account.id, "session-1", InteractionStatus::Completed);
        first.duration_seconds = 60;
        first.sentiment_score = Some(1.0);
        first.summary.message_taken = true;
        finalize_interaction(&db, first).await?;

        let mut second = sample_outcome(account.id, "session-2", InteractionStatus::Voicemail);
        second.duration_seconds = 120;
        second.sentiment_score = Some(0.0);
        finalize_interaction(&db, second).await?;

        let stats = call_statistics(&db, account.id, None).await?;
        assert_eq!(stats.total_calls, 2);
        assert_eq!(stats.avg_duration, 90.0);
        assert_eq!(stats.avg_sentiment, 0.5);
        assert_eq!(stats.messages_taken, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_recomputation_is_idempotent() -> Result<()> {
        let (db, account) = setup_with_account().await?;
        finalize_interaction(
            &db,
            sample_outcome(account.id, "session-1", InteractionStatus::Completed),
        )
        .await?;

        let first = call_statistics(&db, account.id, None).await?;
        let second = call_statistics(&db, account.id, None).await?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_daily_breakdown_groups_by_start_date() -> Result<()> {
        let (db, account) = setup_with_account().await?;

        let mut yesterday = sample_outcome(account.id, "session-1", InteractionStatus::Completed);
        yesterday.started_at = Utc::now() - chrono::Duration::days(1);
        finalize_interaction(&db, yesterday).await?;

        finalize_interaction(
            &db,
            sample_outcome(account.id, "session-2", InteractionStatus::Completed),
        )
        .await?;
        finalize_interaction(
            &db,
            sample_outcome(account.id, "session-3", InteractionStatus::Completed),
        )
        .await?;

        let days = daily_breakdown(&db, account.id, None).await?;
        assert_eq!(days.len(), 2);
        // Sorted ascending: yesterday first.
        assert!(days[0].date < days[1].date);
        assert_eq!(days[0].stats.total_calls, 1);
        assert_eq!(days[1].stats.total_calls, 2);
        Ok(())
    }
}
