use crate::calendar::CalendarEntry;
use crate::error::{PlannerError, PlannerResult};
use crate::lesson::LessonRecord;
use crate::pacing::Pacing;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FALLBACK_LABEL: &str = "Review / Flex / Assessment";

/// How topics are spread across teaching days.
///
/// The two strategies produce different plans for the same input and are
/// never mixed within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionStrategy {
    /// Repeat every topic `pacing.repeat_count()` times, then walk the days in
    /// order. Days past the end of the expanded list get the fallback label.
    #[default]
    Expansion,
    /// Spend `max(1, days / topics)` days on each topic. The last topic absorbs
    /// any remaining days. Pacing is not consulted.
    Stride,
}

impl DistributionStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            DistributionStrategy::Expansion => "expansion",
            DistributionStrategy::Stride => "stride",
        }
    }
}

impl fmt::Display for DistributionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionStrategy {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expansion" | "expand" => Ok(DistributionStrategy::Expansion),
            "stride" => Ok(DistributionStrategy::Stride),
            other => Err(PlannerError::invalid(format!(
                "unknown distribution strategy '{other}' (expected expansion or stride)"
            ))),
        }
    }
}

/// Assign one topic (or the fallback label) to every teaching day.
///
/// The result always has one record per teaching day, each starting out
/// `Upcoming` with empty activity, homework and notes.
pub fn distribute<S: AsRef<str>>(
    topics: &[S],
    pacing: Pacing,
    teaching_days: &[CalendarEntry],
    fallback_label: &str,
    strategy: DistributionStrategy,
) -> PlannerResult<Vec<LessonRecord>> {
    let lessons = match strategy {
        DistributionStrategy::Expansion => {
            distribute_by_expansion(topics, pacing, teaching_days, fallback_label)
        }
        DistributionStrategy::Stride => {
            distribute_by_stride(topics, teaching_days, fallback_label)?
        }
    };
    tracing::debug!(
        %strategy,
        %pacing,
        topics = topics.len(),
        days = teaching_days.len(),
        "distributed topics"
    );
    Ok(lessons)
}

/// Each topic repeated `pacing.repeat_count()` times, original order kept.
pub fn expand_topics<S: AsRef<str>>(topics: &[S], pacing: Pacing) -> Vec<&str> {
    let repeat = pacing.repeat_count();
    topics
        .iter()
        .flat_map(|topic| std::iter::repeat_n(topic.as_ref(), repeat))
        .collect()
}

fn distribute_by_expansion<S: AsRef<str>>(
    topics: &[S],
    pacing: Pacing,
    teaching_days: &[CalendarEntry],
    fallback_label: &str,
) -> Vec<LessonRecord> {
    let expanded = expand_topics(topics, pacing);
    teaching_days
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let topic = expanded.get(i).copied().unwrap_or(fallback_label);
            LessonRecord::for_entry(entry, topic)
        })
        .collect()
}

/// Number of consecutive days each topic holds under the stride strategy.
pub fn stride_repeat_rate(topic_count: usize, day_count: usize) -> PlannerResult<usize> {
    if topic_count == 0 {
        return Err(PlannerError::invalid(
            "stride distribution needs at least one topic",
        ));
    }
    Ok((day_count / topic_count).max(1))
}

/// Topic index used for each day of a stride walk.
///
/// Positions never decrease and never pass `topic_count - 1`.
pub fn stride_cursor_positions(topic_count: usize, day_count: usize) -> PlannerResult<Vec<usize>> {
    let rate = stride_repeat_rate(topic_count, day_count)?;
    let last = topic_count - 1;
    let mut cursor = 0usize;
    let mut positions = Vec::with_capacity(day_count);
    for day in 0..day_count {
        positions.push(cursor);
        if (day + 1) % rate == 0 && cursor < last {
            cursor += 1;
        }
    }
    Ok(positions)
}

fn distribute_by_stride<S: AsRef<str>>(
    topics: &[S],
    teaching_days: &[CalendarEntry],
    fallback_label: &str,
) -> PlannerResult<Vec<LessonRecord>> {
    let positions = stride_cursor_positions(topics.len(), teaching_days.len())?;
    Ok(teaching_days
        .iter()
        .zip(positions)
        .map(|(entry, cursor)| {
            let topic = topics
                .get(cursor)
                .map(AsRef::as_ref)
                .unwrap_or(fallback_label);
            LessonRecord::for_entry(entry, topic)
        })
        .collect())
}
