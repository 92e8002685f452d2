//! Integration tests for session statistics aggregation.

use fakecheck_core::{SessionStats, SessionStatsAggregator, VerdictLevel};

#[test]
fn session_stats_tests_counts_each_verdict_once() {
    let mut aggregator = SessionStatsAggregator::new();
    for _ in 0..3 {
        aggregator.record(VerdictLevel::Danger);
    }
    aggregator.record(VerdictLevel::Safe);

    assert_eq!(
        aggregator.snapshot(),
        SessionStats {
            total: 4,
            ok: 1,
            suspect: 0,
            fake: 3,
        }
    );
}

#[test]
fn session_stats_tests_total_matches_level_counters() {
    let mut aggregator = SessionStatsAggregator::new();
    let levels = [
        VerdictLevel::Suspect,
        VerdictLevel::Safe,
        VerdictLevel::Suspect,
        VerdictLevel::Danger,
        VerdictLevel::Safe,
    ];
    for level in levels {
        aggregator.record(level);
        let stats = aggregator.snapshot();
        assert_eq!(stats.ok + stats.suspect + stats.fake, stats.total);
    }

    assert_eq!(aggregator.rate(VerdictLevel::Suspect), 0.4);
    assert_eq!(aggregator.rate(VerdictLevel::Danger), 0.2);
}

#[test]
fn session_stats_tests_reset_clears_counters() {
    let mut aggregator = SessionStatsAggregator::new();
    aggregator.record(VerdictLevel::Safe);
    aggregator.reset();

    assert_eq!(aggregator.snapshot(), SessionStats::default());
    assert_eq!(aggregator.rate(VerdictLevel::Safe), 0.0);
}
