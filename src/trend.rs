use crate::types::{PeriodMetric, TrendRecord};
use crate::util::pct_change;

/// Attach period-over-period and first-to-last change rates.
///
/// `metrics` must be ordered by group key then period, as produced by
/// [`crate::aggregate::aggregate`]. Rates are percentages rounded to two
/// decimals; a group's first period has no yoy rate, and a single-period
/// group has no total rate. A zero base also leaves the rate undefined.
pub fn analyze(metrics: &[PeriodMetric]) -> Vec<TrendRecord> {
    debug_assert!(metrics
        .windows(2)
        .all(|w| (&w[0].group_key, w[0].period) < (&w[1].group_key, w[1].period)));

    let mut out = Vec::with_capacity(metrics.len());
    for group in metrics.chunk_by(|a, b| a.group_key == b.group_key) {
        let total_change_rate = total_change(group);
        let mut prev: Option<f64> = None;
        for m in group {
            let yoy_change_rate = prev.and_then(|p| pct_change(p, m.avg_unit_price));
            prev = Some(m.avg_unit_price);
            out.push(TrendRecord {
                metric: m.clone(),
                yoy_change_rate,
                total_change_rate,
                rank: None,
            });
        }
    }
    out
}

fn total_change(group: &[PeriodMetric]) -> Option<f64> {
    match group {
        [first, .., last] => pct_change(first.avg_unit_price, last.avg_unit_price),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupKey;

    fn m(key: &str, period: i32, avg: f64) -> PeriodMetric {
        PeriodMetric {
            group_key: GroupKey(vec![key.to_string()]),
            period,
            avg_unit_price: avg,
            record_count: 1,
        }
    }

    #[test]
    fn yoy_and_total_rates() {
        let out = analyze(&[
            m("A", 2021, 100.0),
            m("A", 2022, 110.0),
            m("A", 2023, 99.0),
        ]);
        assert_eq!(out[0].yoy_change_rate, None);
        assert_eq!(out[1].yoy_change_rate, Some(10.0));
        assert_eq!(out[2].yoy_change_rate, Some(-10.0));
        assert!(out.iter().all(|t| t.total_change_rate == Some(-1.0)));
    }

    #[test]
    fn single_period_group_has_no_total_rate() {
        let out = analyze(&[m("A", 2022, 100.0), m("B", 2023, 50.0)]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.total_change_rate.is_none()));
        assert!(out.iter().all(|t| t.yoy_change_rate.is_none()));
    }

    #[test]
    fn zero_base_is_undefined_not_infinite() {
        let out = analyze(&[m("A", 2021, 0.0), m("A", 2022, 10.0), m("A", 2023, 20.0)]);
        assert_eq!(out[1].yoy_change_rate, None);
        assert_eq!(out[2].yoy_change_rate, Some(100.0));
        assert_eq!(out[2].total_change_rate, None);
    }

    #[test]
    fn groups_do_not_leak_into_each_other() {
        let out = analyze(&[m("A", 2022, 100.0), m("B", 2023, 200.0), m("B", 2024, 300.0)]);
        assert_eq!(out[1].yoy_change_rate, None);
        assert_eq!(out[2].yoy_change_rate, Some(50.0));
        assert_eq!(out[0].total_change_rate, None);
        assert_eq!(out[1].total_change_rate, Some(50.0));
    }
}
