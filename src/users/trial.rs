//! Trial/subscription policy.
//!
//! Everything here is derived from stored counters at read time and never
//! persisted.

use time::OffsetDateTime;

use super::repo_types::{SubscriptionStatus, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialStatus {
    /// Milliseconds until `trial_ends_at`, floored at zero.
    pub time_remaining_ms: i64,
    /// Floored at zero.
    pub messages_remaining: i32,
    pub is_trial_expired: bool,
}

impl TrialStatus {
    /// A profile without `trial_ends_at` has no time left, so it reads the
    /// same as a trial that already ran out.
    pub fn evaluate(user: &User, now: OffsetDateTime) -> Self {
        let time_remaining_ms = user
            .trial_ends_at
            .map(|ends| {
                let ms = (ends - now).whole_milliseconds().max(0);
                i64::try_from(ms).unwrap_or(i64::MAX)
            })
            .unwrap_or(0);

        let messages_remaining = user
            .trial_message_limit
            .saturating_sub(user.trial_messages_used)
            .max(0);

        let is_trial_expired = user.subscription_status == SubscriptionStatus::Trial
            && (time_remaining_ms == 0 || messages_remaining == 0);

        Self {
            time_remaining_ms,
            messages_remaining,
            is_trial_expired,
        }
    }
}
