//! Aggregates a student's test history into a summary.
//!
//! Input records must be ordered most recent first (the repository
//! returns them that way). Topic grouping preserves first-seen order so
//! equal percentages rank deterministically, and a zero denominator
//! yields 0% rather than NaN.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classroom::StudentPerformance;

/// Number of strongest/weakest topics reported.
const TOPIC_HIGHLIGHTS: usize = 3;

/// Number of most recent tests included in the progress timeline.
pub const PROGRESS_WINDOW: usize = 10;

/// A topic with its aggregated percentage across all tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    pub percentage: f64,
}

/// One point on the progress timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    pub test_name: String,
    pub percentage: f64,
}

/// Summary of a student's recorded test history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_tests: usize,
    pub average_percentage: f64,
    pub strong_topics: Vec<TopicScore>,
    pub weak_topics: Vec<TopicScore>,
    pub progress: Vec<ProgressPoint>,
}

impl PerformanceSummary {
    /// The summary reported for a student with no recorded tests.
    pub fn empty() -> Self {
        Self {
            total_tests: 0,
            average_percentage: 0.0,
            strong_topics: Vec::new(),
            weak_topics: Vec::new(),
            progress: Vec::new(),
        }
    }
}

/// Rounds to 2 decimal places for reporting.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `marks` out of `total`, or 0 when the total is 0.
fn percentage(marks: f64, total: f64) -> f64 {
    if total > 0.0 {
        marks / total * 100.0
    } else {
        0.0
    }
}

/// Builds the summary for one student's records, most recent first.
pub fn summarize(records: &[StudentPerformance]) -> PerformanceSummary {
    if records.is_empty() {
        return PerformanceSummary::empty();
    }

    let total_tests = records.len();
    let average_percentage = records
        .iter()
        .map(|r| percentage(r.marks_obtained, r.total_marks))
        .sum::<f64>()
        / total_tests as f64;

    // Accumulate per-topic sums in first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, f64)> = HashMap::new();
    for record in records {
        for topic in &record.topic_wise_performance {
            let entry = sums.entry(topic.topic.clone()).or_insert_with(|| {
                order.push(topic.topic.clone());
                (0.0, 0.0)
            });
            entry.0 += topic.marks;
            entry.1 += topic.total;
        }
    }

    let mut topics: Vec<TopicScore> = order
        .into_iter()
        .map(|topic| {
            let (marks, total) = sums[&topic];
            TopicScore {
                topic,
                percentage: round2(percentage(marks, total)),
            }
        })
        .collect();

    // Stable sort keeps first-seen order among equal percentages.
    topics.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let strong_topics: Vec<TopicScore> = topics.iter().take(TOPIC_HIGHLIGHTS).cloned().collect();
    let mut weak_topics: Vec<TopicScore> = topics
        [topics.len().saturating_sub(TOPIC_HIGHLIGHTS)..]
        .to_vec();
    weak_topics.reverse();

    let mut progress: Vec<ProgressPoint> = records
        .iter()
        .take(PROGRESS_WINDOW)
        .map(|r| ProgressPoint {
            date: r.created_at,
            test_name: r.test_name.clone(),
            percentage: round2(percentage(r.marks_obtained, r.total_marks)),
        })
        .collect();
    progress.reverse();

    PerformanceSummary {
        total_tests,
        average_percentage: round2(average_percentage),
        strong_topics,
        weak_topics,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classroom::TopicMarks;
    use chrono::Duration;
    use uuid::Uuid;

    /// Builds a record with the given marks and topic entries.
    /// `age_days` pushes `created_at` into the past so ordering is explicit.
    fn record(
        test_name: &str,
        obtained: f64,
        total: f64,
        topics: &[(&str, f64, f64)],
        age_days: i64,
    ) -> StudentPerformance {
        let topics = topics
            .iter()
            .map(|(topic, marks, total)| TopicMarks {
                topic: topic.to_string(),
                marks: *marks,
                total: *total,
            })
            .collect();
        StudentPerformance::new(
            Uuid::new_v4(),
            "Mathematics",
            test_name,
            obtained,
            total,
            topics,
            "",
            Uuid::new_v4(),
        )
        .with_created_at(Utc::now() - Duration::days(age_days))
    }

    #[test]
    fn test_empty_input_yields_zero_summary() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.average_percentage, 0.0);
        assert!(summary.strong_topics.is_empty());
        assert!(summary.weak_topics.is_empty());
        assert!(summary.progress.is_empty());
    }

    #[test]
    fn test_average_is_mean_of_record_percentages() {
        let records = vec![
            record("t1", 80.0, 100.0, &[], 0),
            record("t2", 60.0, 100.0, &[], 1),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.total_tests, 2);
        assert_eq!(summary.average_percentage, 70.0);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        // 1/3 and 2/3 -> mean 50.0; 1/3 alone -> 33.33
        let records = vec![record("t1", 1.0, 3.0, &[], 0)];
        assert_eq!(summarize(&records).average_percentage, 33.33);
    }

    #[test]
    fn test_topic_sums_across_records() {
        // math: (80+20)/(100+20) = 100/120 = 83.33%
        let records = vec![
            record("t1", 80.0, 100.0, &[("math", 80.0, 100.0)], 0),
            record("t2", 20.0, 20.0, &[("math", 20.0, 20.0)], 1),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.strong_topics.len(), 1);
        assert_eq!(summary.strong_topics[0].topic, "math");
        assert_eq!(summary.strong_topics[0].percentage, 83.33);
    }

    #[test]
    fn test_topic_aggregation_is_order_independent() {
        let forward = vec![
            record("t1", 10.0, 20.0, &[("algebra", 8.0, 10.0), ("geometry", 2.0, 10.0)], 0),
            record("t2", 15.0, 20.0, &[("algebra", 7.0, 10.0), ("geometry", 8.0, 10.0)], 1),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = summarize(&forward);
        let b = summarize(&reversed);

        let score = |s: &PerformanceSummary, name: &str| {
            s.strong_topics
                .iter()
                .chain(s.weak_topics.iter())
                .find(|t| t.topic == name)
                .map(|t| t.percentage)
                .unwrap()
        };
        assert_eq!(score(&a, "algebra"), score(&b, "algebra"));
        assert_eq!(score(&a, "geometry"), score(&b, "geometry"));
    }

    #[test]
    fn test_strong_and_weak_selection() {
        let topics: &[(&str, f64, f64)] = &[
            ("a", 9.0, 10.0), // 90%
            ("b", 8.0, 10.0), // 80%
            ("c", 7.0, 10.0), // 70%
            ("d", 6.0, 10.0), // 60%
            ("e", 5.0, 10.0), // 50%
            ("f", 4.0, 10.0), // 40%
            ("g", 3.0, 10.0), // 30%
        ];
        let records = vec![record("t1", 42.0, 70.0, topics, 0)];

        let summary = summarize(&records);

        let strong: Vec<&str> = summary.strong_topics.iter().map(|t| t.topic.as_str()).collect();
        let weak: Vec<&str> = summary.weak_topics.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(strong, vec!["a", "b", "c"]);
        // Weakest first: the tail of the descending order, reversed.
        assert_eq!(weak, vec!["g", "f", "e"]);
    }

    #[test]
    fn test_strong_and_weak_overlap_with_few_topics() {
        let records = vec![record(
            "t1",
            15.0,
            20.0,
            &[("a", 9.0, 10.0), ("b", 6.0, 10.0)],
            0,
        )];

        let summary = summarize(&records);

        assert_eq!(summary.strong_topics.len(), 2);
        assert_eq!(summary.weak_topics.len(), 2);
        assert_eq!(summary.strong_topics[0].topic, "a");
        assert_eq!(summary.weak_topics[0].topic, "b");
    }

    #[test]
    fn test_equal_percentages_keep_first_seen_order() {
        let records = vec![record(
            "t1",
            30.0,
            40.0,
            &[
                ("first", 5.0, 10.0),
                ("second", 5.0, 10.0),
                ("third", 5.0, 10.0),
                ("fourth", 5.0, 10.0),
            ],
            0,
        )];

        let summary = summarize(&records);

        let strong: Vec<&str> = summary.strong_topics.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(strong, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zero_totals_do_not_produce_nan() {
        let records = vec![record(
            "t1",
            0.0,
            0.0,
            &[("mystery", 3.0, 0.0)],
            0,
        )];

        let summary = summarize(&records);

        assert_eq!(summary.average_percentage, 0.0);
        assert_eq!(summary.strong_topics[0].percentage, 0.0);
        assert!(summary.average_percentage.is_finite());
    }

    #[test]
    fn test_progress_is_chronological_and_windowed() {
        // 12 records, newest first (age 0 = newest).
        let records: Vec<StudentPerformance> = (0..12)
            .map(|i| record(&format!("test-{i}"), 50.0 + i as f64, 100.0, &[], i as i64))
            .collect();

        let summary = summarize(&records);

        assert_eq!(summary.progress.len(), PROGRESS_WINDOW);
        // Oldest of the window first: test-9 down to test-0.
        assert_eq!(summary.progress.first().unwrap().test_name, "test-9");
        assert_eq!(summary.progress.last().unwrap().test_name, "test-0");
        assert!(summary
            .progress
            .windows(2)
            .all(|pair| pair[0].date <= pair[1].date));
    }

    #[test]
    fn test_progress_shorter_than_window() {
        let records = vec![
            record("new", 80.0, 100.0, &[], 0),
            record("old", 40.0, 100.0, &[], 5),
        ];

        let summary = summarize(&records);

        assert_eq!(summary.progress.len(), 2);
        assert_eq!(summary.progress[0].test_name, "old");
        assert_eq!(summary.progress[0].percentage, 40.0);
        assert_eq!(summary.progress[1].test_name, "new");
        assert_eq!(summary.progress[1].percentage, 80.0);
    }
}
