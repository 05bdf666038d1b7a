// tests/aggregation_properties.rs
//
// Properties of the aggregation core over seeded random series, plus the
// 28-day end-to-end scenario.

use std::num::NonZeroUsize;

use rand::{rngs::StdRng, Rng, SeedableRng};

use consultation_sentiment::{
    percent_of, project_series, rank, rebucket, summarize, SentimentCount, SentimentFilter,
    TimePeriodEntry, TimeSeries, TopicDistribution,
};

fn random_series(rng: &mut StdRng, len: usize) -> TimeSeries {
    (0..len)
        .map(|i| {
            TimePeriodEntry::new(
                format!("day-{i}"),
                SentimentCount::new(
                    rng.random_range(0..70),
                    rng.random_range(0..25),
                    rng.random_range(0..45),
                ),
            )
        })
        .collect()
}

fn nz(k: usize) -> NonZeroUsize {
    NonZeroUsize::new(k).unwrap()
}

#[test]
fn summarize_total_and_net_match_raw_sums() {
    let mut rng = StdRng::seed_from_u64(42);
    for len in [0, 1, 13, 100] {
        let s = random_series(&mut rng, len);
        let d = summarize(&s);
        let raw: u64 = s.iter().map(|e| e.counts.total()).sum();
        assert_eq!(d.total, raw);
        assert_eq!(
            d.net_sentiment,
            d.totals_by_class.positive as i64 - d.totals_by_class.negative as i64
        );
    }
}

#[test]
fn rebucket_preserves_totals_and_entry_count() {
    let mut rng = StdRng::seed_from_u64(7);
    for len in [0usize, 1, 6, 7, 8, 28, 100] {
        let s = random_series(&mut rng, len);
        for k in [1usize, 2, 3, 7, 30, 200] {
            let b = rebucket(&s, nz(k));
            assert_eq!(summarize(&b), summarize(&s), "len {len}, k {k}");
            assert_eq!(b.len(), len.div_ceil(k), "len {len}, k {k}");
        }
    }
}

#[test]
fn percent_of_laws() {
    for n in [-5i64, 0, 1, 99, 12_345] {
        assert_eq!(percent_of(n, 0), 0);
    }
    for d in [1i64, 3, 7, 1260] {
        assert_eq!(percent_of(0, d), 0);
        assert_eq!(percent_of(d, d), 100);
    }
}

#[test]
fn projection_all_is_identity_and_masking_keeps_shape() {
    let mut rng = StdRng::seed_from_u64(99);
    let s = random_series(&mut rng, 30);
    assert_eq!(project_series(&s, SentimentFilter::All), s);

    for sel in [
        SentimentFilter::Positive,
        SentimentFilter::Neutral,
        SentimentFilter::Negative,
    ] {
        let p = project_series(&s, sel);
        assert_eq!(p.len(), s.len());
        for (orig, masked) in s.iter().zip(&p) {
            assert_eq!(orig.period_label, masked.period_label);
            let class = sel.class().unwrap();
            assert_eq!(masked.counts.get(class), orig.counts.get(class));
            assert_eq!(masked.counts.total(), orig.counts.get(class));
        }
    }
}

#[test]
fn rank_is_sorted_and_complete() {
    let topics = vec![
        TopicDistribution::new("Definitions", 40, 30, 30),
        TopicDistribution::new("Compliance", 33, 40, 27),
        TopicDistribution::new("Penalties", 28, 32, 40),
        TopicDistribution::new("Jurisdiction", 45, 25, 30),
        TopicDistribution::new("Privacy", 35, 20, 45),
        TopicDistribution::new("Timelines", 30, 50, 20),
    ];
    let ranked = rank(&topics);
    assert_eq!(ranked.len(), topics.len());
    let scores: Vec<u64> = ranked
        .iter()
        .map(|t| t.counts.positive.abs_diff(t.counts.negative))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
    // Definitions (10), Privacy (10), Timelines (10) keep their input order
    let names: Vec<_> = ranked.iter().map(|t| t.topic.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Compliance",
            "Definitions",
            "Privacy",
            "Timelines",
            "Penalties",
            "Jurisdiction"
        ]
    );
}

#[test]
fn four_weeks_end_to_end() {
    let series: TimeSeries = (1..=28)
        .map(|d| TimePeriodEntry::new(format!("{d:02}/09/2025"), SentimentCount::new(30, 10, 5)))
        .collect();

    let d = summarize(&series);
    assert_eq!(d.totals_by_class, SentimentCount::new(840, 280, 140));
    assert_eq!(d.total, 1260);
    assert_eq!(d.net_sentiment, 700);

    let weekly = rebucket(&series, nz(7));
    assert_eq!(weekly.len(), 4);
    for w in &weekly {
        assert_eq!(w.counts, SentimentCount::new(210, 70, 35));
    }
    assert_eq!(weekly[0].period_label, "01/09/2025 → 07/09/2025");
    assert_eq!(weekly[3].period_label, "22/09/2025 → 28/09/2025");

    let again = summarize(&weekly);
    assert_eq!(again.total, 1260);
    assert_eq!(again.net_sentiment, 700);
}
