//! Screening engine - produces one routing decision per incoming interaction.
//!
//! The decision itself is computed by [`decide`], a pure function over an
//! already-fetched snapshot of the account's rules, resolved contact, and
//! business hours: same snapshot and context always yield the same decision.
//! The async wrappers around it do the only I/O in the path, with a bounded
//! timeout, and fall back to the safe per-channel default when the stores are
//! unavailable - never a silent `allow` on a degraded phone path.

use crate::{
    core::{
        contact::VIP_PRIORITY,
        hours::BusinessHours,
        rule::{self, RuleAction, RuleCondition, RuleType},
    },
    entities::{call_rule, contact},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// How long the engine waits for rules/contact/settings before declaring the
/// collaborators unavailable.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// The channel an interaction arrives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// A phone call; the safe fallback decision is voicemail
    Phone,
    /// A web chat; the safe fallback decision is allow-to-queue
    Web,
}

impl Channel {
    /// The storage representation of this channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Web => "web",
        }
    }

    /// Parses a stored channel, rejecting unknown values.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "phone" => Ok(Self::Phone),
            "web" => Ok(Self::Web),
            other => Err(Error::UnknownVariant {
                field: "channel",
                value: other.to_string(),
            }),
        }
    }
}

/// Caller metadata carried by an interaction-start event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Caller phone number, if known
    pub phone: Option<String>,
    /// Caller email, if known
    pub email: Option<String>,
    /// Name the caller declared, if any
    pub name: Option<String>,
    /// Free-text message, present for chats, absent for calls until transcribed
    pub message: Option<String>,
    /// When the interaction started (UTC)
    pub timestamp: DateTime<Utc>,
    /// Which channel the interaction arrived on
    pub channel: Channel,
}

/// The fixed set of routing outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Connect the interaction
    Allow,
    /// Reject the interaction
    Block,
    /// Send the interaction to another destination
    Redirect,
    /// Send the caller to voicemail
    Voicemail,
    /// Fast-path transfer for VIP contacts
    PriorityTransfer,
}

impl Decision {
    /// The storage representation of this decision.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Block => "block",
            Self::Redirect => "redirect",
            Self::Voicemail => "voicemail",
            Self::PriorityTransfer => "priority_transfer",
        }
    }
}

/// What triggered a decision, kept for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Audit {
    /// A call rule matched
    Rule {
        /// ID of the matching rule
        id: i64,
    },
    /// A resolved contact decided the outcome (blocked or VIP)
    Contact {
        /// ID of the resolved contact
        id: i64,
    },
    /// No rule or contact applied; the business-hours default decided
    Default,
}

/// One routing decision plus its audit reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screening {
    /// The routing outcome
    pub decision: Decision,
    /// What triggered it
    pub audit: Audit,
    /// Redirect destination, set only when `decision` is `Redirect`
    pub redirect_target: Option<String>,
}

impl Screening {
    fn new(decision: Decision, audit: Audit) -> Self {
        Self {
            decision,
            audit,
            redirect_target: None,
        }
    }

    /// Serializes the decision for the interaction record's JSON column.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Parses a stored screening blob.
    #[must_use]
    pub fn from_json(raw: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }
}

/// A stored rule whose JSON payloads parsed into known variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningRule {
    /// ID of the underlying rule row
    pub id: i64,
    /// Rule category
    pub rule_type: RuleType,
    /// Parsed condition predicate
    pub condition: RuleCondition,
    /// Parsed action payload
    pub action: RuleAction,
    /// Evaluation priority (lower first)
    pub priority: i32,
}

/// Parses rule rows into well-formed screening rules, preserving their order.
///
/// Rows whose condition or action blob does not parse are skipped with a
/// warning; screening must never crash on a malformed rule.
#[must_use]
pub fn parse_active_rules(models: &[call_rule::Model]) -> Vec<ScreeningRule> {
    let mut rules = Vec::with_capacity(models.len());
    for model in models {
        let rule_type = match RuleType::parse(&model.rule_type) {
            Ok(rule_type) => rule_type,
            Err(_) => {
                warn!(rule_id = model.id, rule_type = %model.rule_type, "skipping rule with unknown type");
                continue;
            }
        };
        let Some(condition) = rule::parse_condition(&model.conditions) else {
            warn!(rule_id = model.id, "skipping rule with malformed condition");
            continue;
        };
        let Some(action) = rule::parse_action(&model.action) else {
            warn!(rule_id = model.id, "skipping rule with malformed action");
            continue;
        };
        rules.push(ScreeningRule {
            id: model.id,
            rule_type,
            condition,
            action,
            priority: model.priority,
        });
    }
    rules
}

/// Everything [`decide`] needs, fetched up front.
#[derive(Debug, Clone)]
pub struct ScreeningSnapshot {
    /// Active rules in evaluation order (priority asc, id asc)
    pub rules: Vec<ScreeningRule>,
    /// The resolved contact for the caller, if any
    pub contact: Option<contact::Model>,
    /// The account's business-hours schedule
    pub hours: BusinessHours,
    /// Offset of the account's local zone from UTC, in minutes
    pub utc_offset_minutes: i32,
}

fn decision_for_action(rule: &ScreeningRule) -> Screening {
    let audit = Audit::Rule { id: rule.id };
    match &rule.action {
        RuleAction::Block => Screening::new(Decision::Block, audit),
        RuleAction::Voicemail => Screening::new(Decision::Voicemail, audit),
        RuleAction::Allow => Screening::new(Decision::Allow, audit),
        RuleAction::Redirect { target } => Screening {
            decision: Decision::Redirect,
            audit,
            redirect_target: Some(target.clone()),
        },
    }
}

/// Whether a timestamp falls inside the account's business hours, after
/// shifting it into the account's local zone.
#[must_use]
pub fn in_business_hours(
    hours: &BusinessHours,
    utc_offset_minutes: i32,
    timestamp: DateTime<Utc>,
) -> bool {
    let local = (timestamp + ChronoDuration::minutes(i64::from(utc_offset_minutes))).naive_utc();
    hours.is_within(local)
}

/// Produces exactly one routing decision for an incoming interaction.
///
/// Pure relative to its inputs: no I/O, no clock reads, no randomness. The
/// order of evaluation is fixed:
///
/// 1. A blocked contact is an absolute veto - `block`, nothing else runs.
/// 2. A contact with priority 9 or above takes the VIP fast-path: blocking
///    rules are still honored (first match wins), but no other rule can
///    override the `priority_transfer`.
/// 3. Otherwise the active rules run in (priority asc, id asc) order and the
///    first matching rule's action decides.
/// 4. With nothing matched, the default is `allow` inside business hours and
///    `voicemail` outside them.
#[must_use]
pub fn decide(snapshot: &ScreeningSnapshot, ctx: &CallerContext) -> Screening {
    // 1. Blocked contact: absolute veto, no rule evaluation at all.
    if let Some(contact) = &snapshot.contact {
        if contact.is_blocked {
            debug!(contact_id = contact.id, "caller is a blocked contact");
            return Screening::new(Decision::Block, Audit::Contact { id: contact.id });
        }
    }

    // 2. VIP fast-path: blocking rules still apply, everything else is skipped.
    if let Some(contact) = &snapshot.contact {
        if contact.priority >= VIP_PRIORITY {
            let veto = snapshot
                .rules
                .iter()
                .filter(|rule| matches!(rule.action, RuleAction::Block))
                .find(|rule| rule::condition_matches(&rule.condition, ctx));
            if let Some(rule) = veto {
                debug!(contact_id = contact.id, rule_id = rule.id, "VIP caller hit a blocking rule");
                return Screening::new(Decision::Block, Audit::Rule { id: rule.id });
            }
            debug!(contact_id = contact.id, "VIP fast-path transfer");
            return Screening::new(Decision::PriorityTransfer, Audit::Contact { id: contact.id });
        }
    }

    // 3. Ordered rule evaluation, first match wins.
    for rule in &snapshot.rules {
        if rule::condition_matches(&rule.condition, ctx) {
            debug!(rule_id = rule.id, priority = rule.priority, "rule matched");
            return decision_for_action(rule);
        }
    }

    // 4. Business-hours default.
    if in_business_hours(&snapshot.hours, snapshot.utc_offset_minutes, ctx.timestamp) {
        Screening::new(Decision::Allow, Audit::Default)
    } else {
        Screening::new(Decision::Voicemail, Audit::Default)
    }
}

/// The safe decision when screening data cannot be fetched: voicemail for
/// phone calls, allow-to-queue for web chats.
#[must_use]
pub fn fallback_decision(channel: Channel) -> Screening {
    let decision = match channel {
        Channel::Phone => Decision::Voicemail,
        Channel::Web => Decision::Allow,
    };
    Screening::new(decision, Audit::Default)
}

/// Fetches the rule set, resolved contact, and business-hours schedule for an
/// account, in the shape [`decide`] consumes.
pub async fn fetch_snapshot(
    db: &DatabaseConnection,
    account_id: i64,
    ctx: &CallerContext,
) -> Result<ScreeningSnapshot> {
    let rule_models = rule::list_active_rules(db, account_id).await?;
    let rules = parse_active_rules(&rule_models);

    let contact = crate::core::contact::resolve_contact(
        db,
        account_id,
        ctx.phone.as_deref(),
        ctx.email.as_deref(),
    )
    .await?;

    let settings = crate::core::settings::get_phone_settings(db, account_id).await?;
    let (hours, utc_offset_minutes) = settings.map_or_else(
        || (BusinessHours::default(), 0),
        |settings| {
            let hours = BusinessHours::from_json(&settings.business_hours).unwrap_or_else(|| {
                warn!(account_id, "malformed business_hours, using default schedule");
                BusinessHours::default()
            });
            (hours, settings.utc_offset_minutes)
        },
    );

    Ok(ScreeningSnapshot {
        rules,
        contact,
        hours,
        utc_offset_minutes,
    })
}

/// Screens one incoming interaction against an account's configuration.
///
/// The snapshot fetch runs under [`FETCH_TIMEOUT`]; a timeout or storage
/// failure surfaces as [`Error::Unavailable`] so the caller can distinguish
/// infrastructure trouble from a real decision.
pub async fn screen_interaction(
    db: &DatabaseConnection,
    account_id: i64,
    ctx: &CallerContext,
) -> Result<Screening> {
    let snapshot = match tokio::time::timeout(FETCH_TIMEOUT, fetch_snapshot(db, account_id, ctx))
        .await
    {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(Error::Database(err))) => {
            return Err(Error::Unavailable {
                message: format!("screening data fetch failed: {err}"),
            });
        }
        Ok(Err(err)) => return Err(err),
        Err(_) => {
            return Err(Error::Unavailable {
                message: "screening data fetch timed out".to_string(),
            });
        }
    };

    Ok(decide(&snapshot, ctx))
}

/// Screens an interaction, substituting the safe per-channel default when the
/// screening data is unavailable.
///
/// Degraded infrastructure never silently becomes `allow` on the phone path:
/// the fallback is voicemail for calls and allow-to-queue for chats, and the
/// failure is logged.
pub async fn screen_with_fallback(
    db: &DatabaseConnection,
    account_id: i64,
    ctx: &CallerContext,
) -> Screening {
    match screen_interaction(db, account_id, ctx).await {
        Ok(screening) => screening,
        Err(err) => {
            warn!(account_id, error = %err, "screening unavailable, applying safe default");
            fallback_decision(ctx.channel)
        }
    }
}
