use std::collections::HashMap;

use seqfuse_core::config::{FusionConfig, LateRegistration};
use seqfuse_core::stats::FusionStats;
use seqfuse_core::Error;
use seqfuse_operators::{Accumulator, Fusion, Grouping, Seq};

/// Deterministic pseudo-random values (xorshift).
fn pseudo_random(n: usize, seed: u64) -> Vec<i64> {
    let mut state = seed.max(1);
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 1000) as i64 - 500
        })
        .collect()
}

type Summary = (i64, usize, i64, i64, i64);

fn summarize(g: Grouping<i64, i64>) -> seqfuse_core::Result<Summary> {
    Ok((*g.key(), g.count()?, g.sum_by(|v| *v)?, g.max()?, g.min()?))
}

/// Materialize every group, then aggregate.
fn naive(data: &[i64], key_of: fn(&i64) -> i64) -> Vec<Summary> {
    let mut order = Vec::new();
    let mut groups: HashMap<i64, Vec<i64>> = HashMap::new();
    for v in data {
        let key = key_of(v);
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(*v);
    }
    order
        .into_iter()
        .map(|key| {
            let items = &groups[&key];
            let total: i64 = items.iter().sum();
            (
                key,
                items.len(),
                total,
                *items.iter().max().unwrap(),
                *items.iter().min().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_length_groups_stream_without_buffering() {
    let fusion = Fusion::default();
    let out = Seq::from_vec(vec!["ab", "c", "de", "fg", "h"])
        .decorate(fusion.clone())
        .group_by(|s| s.len(), |g| Ok((*g.key(), g.sum_by(|s| s.len() as i64)?)))
        .to_vec()
        .unwrap();

    assert_eq!(out, vec![(2, 6), (1, 2)]);
    assert_eq!(fusion.stats().buffered, 0);
}

#[test]
fn test_plain_enumeration_of_short_group() {
    let fusion = Fusion::default();
    let out = Seq::from_vec(vec!["ab", "c", "de", "fg", "h"])
        .decorate(fusion.clone())
        .group_by(
            |s| s.len(),
            |g| {
                let mut items = Vec::new();
                for item in g.clone().into_seq() {
                    items.push(item?);
                }
                Ok(items)
            },
        )
        .to_vec()
        .unwrap();

    assert_eq!(out[1], vec!["c", "h"]);
    assert_eq!(fusion.stats().groups, 2);
}

#[test]
fn test_fused_summaries_match_naive_grouping() {
    let keys: [fn(&i64) -> i64; 3] = [|v| v.rem_euclid(7), |v| v / 100, |_| 0];
    for (seed, key_of) in keys.into_iter().enumerate() {
        let data = pseudo_random(500, seed as u64 + 11);
        let expected = naive(&data, key_of);

        // The first aggregate streams; the later ones are late registrations.
        // Reading the group first keeps every aggregate exact.
        let fused = Seq::from_vec(data.clone())
            .fused()
            .group_by(key_of, |g| {
                g.to_vec()?;
                summarize(g)
            })
            .to_vec()
            .unwrap();
        let plain = Seq::from_vec(data.clone())
            .group_by(key_of, summarize)
            .to_vec()
            .unwrap();

        assert_eq!(fused, expected);
        assert_eq!(plain, expected);

        let covered: usize = fused.iter().map(|s| s.1).sum();
        assert_eq!(covered, data.len());
    }
}

#[test]
fn test_single_aggregate_streams_exactly() {
    let data = pseudo_random(1000, 3);
    let key_of = |v: &i64| v.rem_euclid(10);
    let fusion = Fusion::default();
    let sums = Seq::from_vec(data.clone())
        .decorate(fusion.clone())
        .group_by(key_of, |g| Ok((*g.key(), g.sum_by(|v| *v)?)))
        .to_vec()
        .unwrap();

    let expected: Vec<(i64, i64)> = naive(&data, |v| v.rem_euclid(10))
        .into_iter()
        .map(|s| (s.0, s.2))
        .collect();
    assert_eq!(sums, expected);

    let stats = fusion.stats();
    assert_eq!(stats.buffered, 0);
    assert_eq!(stats.elements, data.len());
    assert_eq!(stats.late_registrations, 0);
}

#[test]
fn test_stats_serialize_to_json() {
    let fusion = Fusion::default();
    Seq::from_vec(vec![1, 2, 1])
        .decorate(fusion.clone())
        .group_by(|v| *v, |g| g.count())
        .to_vec()
        .unwrap();

    let json = serde_json::to_string(&fusion.stats()).unwrap();
    let back: FusionStats = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fusion.stats());
    assert_eq!(back.groups, 2);
}

#[test]
fn test_reject_policy_from_json_config() {
    let config = FusionConfig::from_json(r#"{ "late_registration": "reject" }"#).unwrap();
    assert_eq!(config.late_registration, LateRegistration::Reject);

    let err = Seq::from_vec(vec!["x", "y", "x"])
        .decorate(Fusion::new(config))
        .group_by(|s| *s, |g| Ok((g.count()?, g.max()?)))
        .to_vec()
        .unwrap_err();
    assert!(matches!(err, Error::LateRegistration { .. }));
}

#[test]
fn test_groupings_outlive_the_outward_sequence() {
    let groups: Vec<Grouping<bool, i64>> = Seq::from_iter_lazy(1..=6)
        .fused()
        .group_by(|v| v % 2 == 0, Ok)
        .to_vec()
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert!(!*groups[0].key());
    assert_eq!(groups[0].to_vec().unwrap(), vec![1, 3, 5]);
    assert_eq!(groups[1].sum_by(|v| *v).unwrap(), 12);
    assert!(groups[1].is_buffered().unwrap());
}

/// Joins the group's words; not one of the built-in aggregates.
#[derive(Default)]
struct Joined(String);

impl Accumulator<&'static str> for Joined {
    fn accumulate(&mut self, item: &&'static str) {
        if !self.0.is_empty() {
            self.0.push('+');
        }
        self.0.push_str(item);
    }
}

#[test]
fn test_custom_accumulator_streams() {
    let fusion = Fusion::default();
    let out = Seq::from_vec(vec!["a", "bb", "c", "dd", "e"])
        .decorate(fusion.clone())
        .group_by(
            |s| s.len(),
            |g| g.aggregate(Joined::default(), |j| std::mem::take(&mut j.0)),
        )
        .to_vec()
        .unwrap();

    assert_eq!(out, vec!["a+c+e".to_string(), "bb+dd".to_string()]);
    assert_eq!(fusion.stats().buffered, 0);
}

#[test]
fn test_empty_source_yields_no_groups() {
    let fusion = Fusion::default();
    let out = Seq::<i64>::empty()
        .decorate(fusion.clone())
        .group_by(|v| *v, |g| g.max())
        .to_vec()
        .unwrap();
    assert!(out.is_empty());
    assert_eq!(fusion.stats(), FusionStats::default());
}
