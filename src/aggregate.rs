use crate::normalize::PricedRecord;
use crate::types::{Dimension, GroupKey, PeriodField, PeriodMetric};
use std::collections::BTreeMap;

/// Average unit price and record count per (group key, period).
///
/// Output is ordered by group key, then period ascending; the trend stage
/// relies on that ordering for its "first" and "last" periods. Records with
/// no value for the period field are left out.
pub fn aggregate(
    records: &[PricedRecord<'_>],
    dims: &[Dimension],
    period: PeriodField,
) -> Vec<PeriodMetric> {
    #[derive(Default)]
    struct Acc {
        prices: Vec<f64>,
    }

    let mut map: BTreeMap<(GroupKey, i32), Acc> = BTreeMap::new();
    let mut no_period = 0usize;
    for r in records {
        let Some(p) = period.value(r.record) else {
            no_period += 1;
            continue;
        };
        let key = (GroupKey::of(r.record, dims), p);
        map.entry(key).or_default().prices.push(r.unit_price);
    }
    if no_period > 0 {
        log::debug!("{} priced records had no {:?} value", no_period, period);
    }

    map.into_iter()
        .map(|((group_key, period), acc)| PeriodMetric {
            group_key,
            period,
            avg_unit_price: crate::util::average(&acc.prices),
            record_count: acc.prices.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::TransactionRecord;

    fn rec(district: &str, dong: &str, year: Option<i32>, amount: i64, area: f64) -> TransactionRecord {
        TransactionRecord {
            district: district.to_string(),
            legal_subdivision: dong.to_string(),
            reception_year: year,
            amount: Some(amount),
            building_area: Some(area),
            ..Default::default()
        }
    }

    #[test]
    fn groups_by_key_and_period_in_order() {
        let rows = vec![
            rec("B", "x", Some(2023), 100, 1.0),
            rec("A", "x", Some(2023), 300, 1.0),
            rec("A", "y", Some(2022), 100, 1.0),
            rec("A", "x", Some(2022), 200, 1.0),
            rec("A", "x", Some(2023), 100, 1.0),
        ];
        let priced = normalize(&rows);
        let out = aggregate(&priced, &[Dimension::District], PeriodField::ReceptionYear);

        let keys: Vec<(String, i32, usize)> = out
            .iter()
            .map(|m| (m.group_key.to_string(), m.period, m.record_count))
            .collect();
        assert_eq!(
            keys,
            vec![("A".into(), 2022, 2), ("A".into(), 2023, 2), ("B".into(), 2023, 1)]
        );
        assert_eq!(out[0].avg_unit_price, 1_500_000.0);
        assert_eq!(out[1].avg_unit_price, 2_000_000.0);
    }

    #[test]
    fn multi_dimension_keys_stay_distinct() {
        let rows = vec![rec("A", "x", Some(2022), 1, 1.0), rec("A", "y", Some(2022), 1, 1.0)];
        let priced = normalize(&rows);
        let out = aggregate(
            &priced,
            &[Dimension::District, Dimension::Subdivision],
            PeriodField::ReceptionYear,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].group_key, GroupKey(vec!["A".into(), "x".into()]));
    }

    #[test]
    fn records_without_period_are_skipped() {
        let rows = vec![rec("A", "x", None, 1, 1.0), rec("A", "x", Some(2022), 1, 1.0)];
        let priced = normalize(&rows);
        let out = aggregate(&priced, &[Dimension::District], PeriodField::ReceptionYear);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record_count, 1);
    }
}
