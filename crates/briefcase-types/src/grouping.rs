//! Date buckets for the conversation sidebar.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt;

use crate::conversation::Conversation;

/// Display bucket, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DateGroup {
    Today,
    Yesterday,
    #[serde(rename = "This Week")]
    ThisWeek,
    #[serde(rename = "This Month")]
    ThisMonth,
    Older,
}

impl DateGroup {
    pub const ALL: [DateGroup; 5] = [
        DateGroup::Today,
        DateGroup::Yesterday,
        DateGroup::ThisWeek,
        DateGroup::ThisMonth,
        DateGroup::Older,
    ];

    /// Bucket for a calendar-day distance (future dates count as today)
    pub fn from_days_ago(days: i64) -> Self {
        match days {
            i64::MIN..=0 => DateGroup::Today,
            1 => DateGroup::Yesterday,
            2..=7 => DateGroup::ThisWeek,
            8..=30 => DateGroup::ThisMonth,
            _ => DateGroup::Older,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateGroup::Today => "Today",
            DateGroup::Yesterday => "Yesterday",
            DateGroup::ThisWeek => "This Week",
            DateGroup::ThisMonth => "This Month",
            DateGroup::Older => "Older",
        }
    }
}

impl fmt::Display for DateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationGroup<'a> {
    pub group: DateGroup,
    pub conversations: Vec<&'a Conversation>,
}

/// Bucket conversations by last activity relative to `now`, in `now`'s timezone.
///
/// Empty groups are omitted. Each group is sorted newest-first by creation
/// time; ties keep their input order.
pub fn group_conversations<'a, Tz: TimeZone>(
    conversations: &'a [Conversation],
    now: &DateTime<Tz>,
) -> Vec<ConversationGroup<'a>> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut buckets: [Vec<&'a Conversation>; 5] = Default::default();
    for conv in conversations {
        let activity_day = conv.last_activity().with_timezone(&tz).date_naive();
        let group = DateGroup::from_days_ago((today - activity_day).num_days());
        buckets[group as usize].push(conv);
    }

    DateGroup::ALL
        .into_iter()
        .zip(buckets)
        .filter(|(_, convs)| !convs.is_empty())
        .map(|(group, mut convs)| {
            convs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            ConversationGroup {
                group,
                conversations: convs,
            }
        })
        .collect()
}
