// Grouping and summary statistics over normalized records

use crate::field::{Dimension, GroupKey, Measure};
use crate::record::{SleepDisorder, SleepRecord};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::RangeInclusive;

/// Records sharing one composite key.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: Vec<GroupKey>,
    pub members: Vec<&'a SleepRecord>,
}

/// Partition `records` by the given dimensions, groups in first-seen order.
///
/// A record missing a value for any dimension is left out.
pub fn group_by<'a, I>(records: I, dimensions: &[Dimension]) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a SleepRecord>,
{
    let mut index: HashMap<Vec<GroupKey>, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for record in records {
        let key: Option<Vec<GroupKey>> = dimensions.iter().map(|d| d.key(record)).collect();
        let Some(key) = key else { continue };

        match index.get(&key) {
            Some(&i) => groups[i].members.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    groups
}

/// How members of a group are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counting {
    Rows,
    /// Distinct non-empty person ids; falls back to rows when no member
    /// carries an id.
    DistinctPersonIds,
}

/// Output ordering of an aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOrder {
    /// Order in which keys were first seen.
    Insertion,
    /// Fixed order over the first dimension. Groups outside the domain are
    /// dropped; for a single dimension every domain key gets an entry, empty
    /// or not.
    Domain(Vec<GroupKey>),
    /// Largest count first, ties in first-seen order.
    CountDescending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStat {
    pub count: usize,
    pub means: BTreeMap<Measure, Option<f64>>,
}

impl AggregateStat {
    pub fn empty(measures: &[Measure]) -> Self {
        Self {
            count: 0,
            means: measures.iter().map(|m| (*m, None)).collect(),
        }
    }

    pub fn from_members(members: &[&SleepRecord], measures: &[Measure], counting: Counting) -> Self {
        let count = match counting {
            Counting::Rows => members.len(),
            Counting::DistinctPersonIds => {
                let ids: HashSet<&str> = members
                    .iter()
                    .filter_map(|r| r.person_id.as_deref())
                    .filter(|id| !id.is_empty())
                    .collect();
                if ids.is_empty() {
                    members.len()
                } else {
                    ids.len()
                }
            }
        };

        let means = measures
            .iter()
            .map(|m| (*m, mean(members.iter().filter_map(|r| m.value(r)))))
            .collect();

        Self { count, means }
    }

    /// Mean of `measure`; `None` when it was not requested or no member had
    /// a value.
    pub fn mean(&self, measure: Measure) -> Option<f64> {
        self.means.get(&measure).copied().flatten()
    }
}

/// Arithmetic mean, undefined for an empty input.
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// Ordered mapping from composite key to summary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub entries: Vec<(Vec<GroupKey>, AggregateStat)>,
}

impl Aggregation {
    pub fn get(&self, key: &[GroupKey]) -> Option<&AggregateStat> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, stat)| stat)
    }

    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group `records` by `dimensions` and summarize each group.
pub fn aggregate<'a, I>(
    records: I,
    dimensions: &[Dimension],
    measures: &[Measure],
    order: &KeyOrder,
    counting: Counting,
) -> Aggregation
where
    I: IntoIterator<Item = &'a SleepRecord>,
{
    let groups = group_by(records, dimensions);
    debug!("aggregated by {:?} into {} groups", dimensions, groups.len());

    let mut entries: Vec<(Vec<GroupKey>, AggregateStat)> = groups
        .iter()
        .map(|g| (g.key.clone(), AggregateStat::from_members(&g.members, measures, counting)))
        .collect();

    match order {
        KeyOrder::Insertion => {}
        KeyOrder::CountDescending => {
            // sort_by is stable, so ties keep first-seen order
            entries.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        }
        KeyOrder::Domain(domain) => {
            let position: HashMap<&GroupKey, usize> =
                domain.iter().enumerate().map(|(i, k)| (k, i)).collect();

            entries.retain(|(key, _)| key.first().is_some_and(|k| position.contains_key(k)));
            entries.sort_by_key(|(key, _)| key.first().and_then(|k| position.get(k)).copied());

            if dimensions.len() == 1 {
                let mut filled = Vec::with_capacity(domain.len());
                let mut iter = entries.into_iter().peekable();
                for domain_key in domain {
                    match iter.peek() {
                        Some((key, _)) if &key[0] == domain_key => {
                            if let Some(entry) = iter.next() {
                                filled.push(entry);
                            }
                        }
                        _ => filled.push((vec![domain_key.clone()], AggregateStat::empty(measures))),
                    }
                }
                entries = filled;
            }
        }
    }

    Aggregation { entries }
}

/// Disorder counts and mean sleep duration for one quality score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityBucket {
    pub quality: u8,
    pub none: usize,
    pub insomnia: usize,
    pub sleep_apnea: usize,
    pub avg_duration: Option<f64>,
}

impl QualityBucket {
    pub fn count_for(&self, disorder: &SleepDisorder) -> usize {
        match disorder {
            SleepDisorder::None => self.none,
            SleepDisorder::Insomnia => self.insomnia,
            SleepDisorder::SleepApnea => self.sleep_apnea,
            SleepDisorder::Other(_) => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.none + self.insomnia + self.sleep_apnea
    }
}

/// One bucket per score in `domain`, including empty ones.
pub fn quality_breakdown(records: &[SleepRecord], domain: RangeInclusive<u8>) -> Vec<QualityBucket> {
    let domain_keys = crate::field::score_domain(domain);

    let by_quality = aggregate(
        records,
        &[Dimension::Quality],
        &[Measure::SleepDuration],
        &KeyOrder::Domain(domain_keys.clone()),
        Counting::Rows,
    );
    let by_disorder = aggregate(
        records,
        &[Dimension::Quality, Dimension::Disorder],
        &[],
        &KeyOrder::Domain(domain_keys),
        Counting::Rows,
    );

    let count_of = |quality: &GroupKey, disorder: SleepDisorder| {
        by_disorder
            .get(&[quality.clone(), GroupKey::label(disorder.label())])
            .map_or(0, |s| s.count)
    };

    by_quality
        .entries
        .iter()
        .filter_map(|(key, stat)| {
            let quality = key[0].as_score()?;
            Some(QualityBucket {
                quality,
                none: count_of(&key[0], SleepDisorder::None),
                insomnia: count_of(&key[0], SleepDisorder::Insomnia),
                sleep_apnea: count_of(&key[0], SleepDisorder::SleepApnea),
                avg_duration: stat.mean(Measure::SleepDuration),
            })
        })
        .collect()
}

/// Per-occupation headcount with mean sleep quality and stress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationStat {
    pub name: String,
    pub count: usize,
    pub avg_quality: Option<f64>,
    pub avg_stress: Option<f64>,
}

/// Occupations in first-seen order. Repeated rows for one person id are
/// counted once.
pub fn occupation_stats(records: &[SleepRecord]) -> Vec<OccupationStat> {
    aggregate(
        records,
        &[Dimension::Occupation],
        &[Measure::Quality, Measure::Stress],
        &KeyOrder::Insertion,
        Counting::DistinctPersonIds,
    )
    .entries
    .into_iter()
    .map(|(key, stat)| OccupationStat {
        name: key[0].to_string(),
        count: stat.count,
        avg_quality: stat.mean(Measure::Quality),
        avg_stress: stat.mean(Measure::Stress),
    })
    .collect()
}
