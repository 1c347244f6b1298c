use chrono::{NaiveDate, Weekday};
use curriculum_planner::{
    CalendarEntry, DEFAULT_FALLBACK_LABEL, DistributionStrategy, LessonStatus, Pacing,
    PlannerError, TeachingWeek, distribute, filter_teaching_days, stride_cursor_positions,
};

const FALLBACK: &str = "Review / Flex / Assessment";

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `count` consecutive calendar days from Monday 2025-01-06.
fn days(count: u32) -> Vec<CalendarEntry> {
    (0..count)
        .map(|offset| CalendarEntry::new(d(2025, 1, 6 + offset)))
        .collect()
}

fn topics_of(lessons: &[curriculum_planner::LessonRecord]) -> Vec<&str> {
    lessons.iter().map(|l| l.topic.as_str()).collect()
}

#[test]
fn normal_pacing_pads_with_fallback() {
    let lessons = distribute(
        &["A", "B"],
        Pacing::Normal,
        &days(3),
        FALLBACK,
        DistributionStrategy::Expansion,
    )
    .unwrap();
    assert_eq!(topics_of(&lessons), vec!["A", "B", FALLBACK]);
}

#[test]
fn slow_pacing_truncates_expanded_topics_to_day_count() {
    let lessons = distribute(
        &["A", "B"],
        Pacing::Slow,
        &days(3),
        FALLBACK,
        DistributionStrategy::Expansion,
    )
    .unwrap();
    assert_eq!(topics_of(&lessons), vec!["A", "A", "B"]);
}

#[test]
fn fast_pacing_gives_each_topic_one_day() {
    let lessons = distribute(
        &["A", "B", "C"],
        Pacing::Fast,
        &days(4),
        FALLBACK,
        DistributionStrategy::Expansion,
    )
    .unwrap();
    assert_eq!(topics_of(&lessons), vec!["A", "B", "C", FALLBACK]);
}

#[test]
fn empty_days_give_empty_plan_under_both_strategies() {
    for strategy in [DistributionStrategy::Expansion, DistributionStrategy::Stride] {
        let lessons = distribute(&["A", "B"], Pacing::Slow, &[], FALLBACK, strategy).unwrap();
        assert!(lessons.is_empty(), "{strategy} should produce no lessons");
    }
}

#[test]
fn expansion_with_no_topics_is_all_fallback() {
    let topics: [&str; 0] = [];
    let lessons = distribute(
        &topics,
        Pacing::Normal,
        &days(3),
        FALLBACK,
        DistributionStrategy::Expansion,
    )
    .unwrap();
    assert_eq!(topics_of(&lessons), vec![FALLBACK; 3]);
}

#[test]
fn expansion_prefix_matches_expanded_sequence() {
    let topics = ["A", "B", "C"];
    for pacing in Pacing::ALL {
        for day_count in [0, 1, 4, 6, 9] {
            let teaching_days = days(day_count);
            let lessons = distribute(
                &topics,
                pacing,
                &teaching_days,
                FALLBACK,
                DistributionStrategy::Expansion,
            )
            .unwrap();
            let expanded: Vec<&str> = topics
                .iter()
                .flat_map(|t| std::iter::repeat_n(*t, pacing.repeat_count()))
                .collect();
            let covered = expanded.len().min(teaching_days.len());

            assert_eq!(lessons.len(), teaching_days.len());
            assert_eq!(&topics_of(&lessons)[..covered], &expanded[..covered]);
            assert!(lessons[covered..].iter().all(|l| l.topic == FALLBACK));
        }
    }
}

#[test]
fn stride_spreads_topics_evenly() {
    let lessons = distribute(
        &["A", "B"],
        Pacing::Normal,
        &days(4),
        FALLBACK,
        DistributionStrategy::Stride,
    )
    .unwrap();
    assert_eq!(topics_of(&lessons), vec!["A", "A", "B", "B"]);
}

#[test]
fn stride_last_topic_absorbs_remaining_days() {
    let lessons = distribute(
        &["A", "B", "C"],
        Pacing::Slow,
        &days(7),
        FALLBACK,
        DistributionStrategy::Stride,
    )
    .unwrap();
    assert_eq!(topics_of(&lessons), vec!["A", "A", "B", "B", "C", "C", "C"]);
}

#[test]
fn stride_ignores_pacing() {
    let run = |pacing| {
        distribute(
            &["A", "B", "C"],
            pacing,
            &days(8),
            FALLBACK,
            DistributionStrategy::Stride,
        )
        .unwrap()
    };
    assert_eq!(run(Pacing::Slow), run(Pacing::Fast));
}

#[test]
fn stride_with_no_topics_is_invalid_input() {
    let topics: [&str; 0] = [];
    let err = distribute(
        &topics,
        Pacing::Normal,
        &days(4),
        FALLBACK,
        DistributionStrategy::Stride,
    )
    .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput(_)));
}

#[test]
fn stride_cursor_is_monotonic_and_bounded() {
    for topic_count in 1..6 {
        for day_count in 0..25 {
            let positions = stride_cursor_positions(topic_count, day_count).unwrap();
            assert_eq!(positions.len(), day_count);
            assert!(positions.windows(2).all(|w| w[0] <= w[1]));
            assert!(positions.iter().all(|&p| p < topic_count));
        }
    }
}

#[test]
fn every_lesson_starts_upcoming_and_blank() {
    let lessons = distribute(
        &["A"],
        Pacing::Normal,
        &days(3),
        DEFAULT_FALLBACK_LABEL,
        DistributionStrategy::Expansion,
    )
    .unwrap();
    for lesson in &lessons {
        assert_eq!(lesson.status, LessonStatus::Upcoming);
        assert!(lesson.activity.is_empty());
        assert!(lesson.homework.is_empty());
        assert!(lesson.notes.is_empty());
    }
    assert_eq!(lessons[1].date, d(2025, 1, 7));
    assert_eq!(lessons[1].weekday, Weekday::Tue);
}

#[test]
fn distribution_is_repeatable() {
    let teaching_days = filter_teaching_days(
        &(1..=31).map(|day| d(2025, 3, day)).collect::<Vec<_>>(),
        &TeachingWeek::new([Weekday::Tue, Weekday::Thu]),
    );
    let topics = ["Cells", "Genetics", "Evolution"];
    for strategy in [DistributionStrategy::Expansion, DistributionStrategy::Stride] {
        let first = distribute(&topics, Pacing::Slow, &teaching_days, FALLBACK, strategy).unwrap();
        let second = distribute(&topics, Pacing::Slow, &teaching_days, FALLBACK, strategy).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn strategy_names_parse() {
    assert_eq!(
        "Stride".parse::<DistributionStrategy>().unwrap(),
        DistributionStrategy::Stride
    );
    assert_eq!(
        "expansion".parse::<DistributionStrategy>().unwrap(),
        DistributionStrategy::Expansion
    );
    assert!("round-robin".parse::<DistributionStrategy>().is_err());
}
