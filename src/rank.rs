use crate::types::{GroupKey, RankedGroup, SecondarySort, TrendRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Collapse trend rows into one summary per group key.
///
/// Expects the group/period ordering produced by the trend stage.
pub fn collapse(trends: &[TrendRecord]) -> Vec<RankedGroup> {
    trends
        .chunk_by(|a, b| a.metric.group_key == b.metric.group_key)
        .filter_map(|group| {
            let (first, last) = (group.first()?, group.last()?);
            Some(RankedGroup {
                group_key: first.metric.group_key.clone(),
                first_period: first.metric.period,
                last_period: last.metric.period,
                transaction_count: group.iter().map(|t| t.metric.record_count).sum(),
                latest_avg_unit_price: last.metric.avg_unit_price,
                total_change_rate: first.total_change_rate,
                rank: None,
            })
        })
        .collect()
}

/// Dense-rank groups by total change rate, highest first.
///
/// With `partition` set, ranking restarts for each distinct value at that
/// position of the group key. Groups without a total change rate get no
/// rank. Rates are compared as the rounded values they already are, with
/// `-0.0` folded into `0.0`.
pub fn dense_rank(groups: &mut [RankedGroup], partition: Option<usize>) {
    let part_of = |key: &GroupKey| -> Option<String> {
        partition.and_then(|i| key.0.get(i).cloned())
    };

    let mut distinct: HashMap<Option<String>, Vec<f64>> = HashMap::new();
    for g in groups.iter() {
        if let Some(rate) = g.total_change_rate {
            distinct.entry(part_of(&g.group_key)).or_default().push(rate + 0.0);
        }
    }
    // Highest first; the index of a rate in its deduplicated list is rank - 1.
    for rates in distinct.values_mut() {
        rates.sort_by(|a, b| b.total_cmp(a));
        rates.dedup_by(|a, b| a.total_cmp(b).is_eq());
    }

    for g in groups.iter_mut() {
        g.rank = g.total_change_rate.and_then(|rate| {
            let rate = rate + 0.0;
            distinct
                .get(&part_of(&g.group_key))
                .and_then(|rates| rates.iter().position(|r| r.total_cmp(&rate).is_eq()))
                .and_then(|i| u32::try_from(i + 1).ok())
        });
    }
}

/// Copy each group's rank onto its period rows.
pub fn apply_ranks(trends: &mut [TrendRecord], groups: &[RankedGroup]) {
    let by_key: HashMap<&GroupKey, Option<u32>> =
        groups.iter().map(|g| (&g.group_key, g.rank)).collect();
    for t in trends.iter_mut() {
        t.rank = by_key.get(&t.metric.group_key).copied().flatten();
    }
}

/// Ranked before unranked, then ascending rank.
fn cmp_rank(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_trends(trends: &mut [TrendRecord], secondary: SecondarySort) {
    trends.sort_by(|a, b| {
        cmp_rank(a.rank, b.rank).then_with(|| match secondary {
            SecondarySort::Group => a
                .metric
                .group_key
                .cmp(&b.metric.group_key)
                .then(a.metric.period.cmp(&b.metric.period)),
            SecondarySort::Period => a
                .metric
                .period
                .cmp(&b.metric.period)
                .then_with(|| a.metric.group_key.cmp(&b.metric.group_key)),
        })
    });
}

pub fn sort_groups(groups: &mut [RankedGroup]) {
    groups.sort_by(|a, b| cmp_rank(a.rank, b.rank).then_with(|| a.group_key.cmp(&b.group_key)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(parts: &[&str], rate: Option<f64>) -> RankedGroup {
        RankedGroup {
            group_key: GroupKey(parts.iter().map(|s| s.to_string()).collect()),
            first_period: 2021,
            last_period: 2023,
            transaction_count: 1,
            latest_avg_unit_price: 1.0,
            total_change_rate: rate,
            rank: None,
        }
    }

    fn ranks(groups: &[RankedGroup]) -> Vec<Option<u32>> {
        groups.iter().map(|g| g.rank).collect()
    }

    #[test]
    fn ties_share_rank_without_gaps() {
        let mut groups = vec![
            g(&["a"], Some(10.0)),
            g(&["b"], Some(8.0)),
            g(&["c"], Some(10.0)),
            g(&["d"], Some(-2.5)),
        ];
        dense_rank(&mut groups, None);
        assert_eq!(ranks(&groups), vec![Some(1), Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn undefined_rates_are_unranked_and_sort_last() {
        let mut groups = vec![g(&["a"], None), g(&["b"], Some(1.0)), g(&["c"], Some(3.0))];
        dense_rank(&mut groups, None);
        sort_groups(&mut groups);
        let order: Vec<String> = groups.iter().map(|g| g.group_key.to_string()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
        assert_eq!(ranks(&groups), vec![Some(1), Some(2), None]);
    }

    #[test]
    fn negative_zero_ties_with_zero() {
        let mut groups = vec![g(&["a"], Some(-0.0)), g(&["b"], Some(0.0))];
        dense_rank(&mut groups, None);
        assert_eq!(ranks(&groups), vec![Some(1), Some(1)]);
    }

    #[test]
    fn extreme_rates_keep_distinct_ranks() {
        let mut groups = vec![g(&["a"], Some(1e17)), g(&["b"], Some(2e17)), g(&["c"], Some(2e17))];
        dense_rank(&mut groups, None);
        assert_eq!(ranks(&groups), vec![Some(2), Some(1), Some(1)]);
    }

    #[test]
    fn partitioned_ranking_restarts_per_partition() {
        let mut groups = vec![
            g(&["도봉구", "방학동"], Some(5.0)),
            g(&["도봉구", "창동"], Some(7.0)),
            g(&["강남구", "역삼동"], Some(1.0)),
        ];
        dense_rank(&mut groups, Some(0));
        assert_eq!(ranks(&groups), vec![Some(2), Some(1), Some(1)]);
    }
}
