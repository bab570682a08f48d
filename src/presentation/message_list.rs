//! Message list layout: day grouping, labels, and text rendering.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::domain::Message;

/// One message as placed in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEntry {
    pub message: Message,
    /// Sent by the signed-in user
    pub is_own: bool,
    /// Last message of a run by the same other sender
    pub show_avatar: bool,
}

/// Messages sharing a calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageGroup {
    pub date: NaiveDate,
    pub label: String,
    pub entries: Vec<MessageEntry>,
}

/// "Today", "Yesterday", or the ISO date.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".into()
    } else if Some(date) == today.checked_sub_signed(Duration::days(1)) {
        "Yesterday".into()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Wall-clock `HH:MM` of `timestamp` in `tz`.
pub fn format_time<Tz>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%H:%M").to_string()
}

/// Group messages by day in `tz`, keeping first-seen day order and the
/// original order within each day.
pub fn group_by_date<Tz: TimeZone>(
    messages: &[Message],
    own_id: Option<i64>,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<MessageGroup> {
    let mut groups: Vec<MessageGroup> = Vec::new();

    for message in messages {
        let date = message.timestamp.with_timezone(tz).date_naive();
        let entry = MessageEntry {
            message: message.clone(),
            is_own: own_id.is_some_and(|id| message.is_from(id)),
            show_avatar: false,
        };
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.entries.push(entry),
            None => groups.push(MessageGroup {
                date,
                label: date_label(date, today),
                entries: vec![entry],
            }),
        }
    }

    for group in &mut groups {
        let senders: Vec<i64> = group.entries.iter().map(|e| e.message.sender.id).collect();
        for (i, entry) in group.entries.iter_mut().enumerate() {
            let next_differs = senders.get(i + 1).map_or(true, |next| *next != senders[i]);
            entry.show_avatar = !entry.is_own && next_differs;
        }
    }

    groups
}

/// Plain-text lines for a terminal.
pub fn render_lines<Tz>(groups: &[MessageGroup], tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("--- {} ---", group.label));
        for entry in &group.entries {
            let time = format_time(entry.message.timestamp, tz);
            if entry.is_own {
                lines.push(format!("    [{}] you: {}", time, entry.message.content));
            } else {
                let avatar = if entry.show_avatar {
                    format!("({})", entry.message.sender.initial())
                } else {
                    "   ".into()
                };
                lines.push(format!(
                    "{} [{}] {}: {}",
                    avatar, time, entry.message.sender.username, entry.message.content
                ));
            }
        }
    }
    lines
}
