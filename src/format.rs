//! Display rendering for the result tables.
//!
//! This is the only place an undefined metric turns into text; everything
//! upstream carries it as `None`.

use crate::types::{
    ParkingRecord, ParkingRow, RankedGroup, RankingRow, SearchRow, TransactionRecord, TrendRecord,
    TrendRow,
};
use crate::util::{format_int, format_number};

pub const PLACEHOLDER: &str = "-";

/// Rounded to whole won with thousands separators.
pub fn format_price(v: f64) -> String {
    format_number(v, 0)
}

pub fn format_rate(v: Option<f64>) -> String {
    v.map_or_else(|| PLACEHOLDER.to_string(), |r| format!("{:.2}", r + 0.0))
}

fn or_placeholder<T, F>(v: Option<T>, f: F) -> String
where
    F: FnOnce(T) -> String,
{
    v.map_or_else(|| PLACEHOLDER.to_string(), f)
}

/// Replace a blank cell with the placeholder; anything else is returned
/// untouched, so applying this twice is a no-op.
pub fn fill_missing(cell: String) -> String {
    if cell.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        cell
    }
}

pub fn format_trends(trends: &[TrendRecord]) -> Vec<TrendRow> {
    trends
        .iter()
        .map(|t| TrendRow {
            group: t.metric.group_key.to_string(),
            period: t.metric.period.to_string(),
            avg_unit_price: format_price(t.metric.avg_unit_price),
            record_count: format_int(t.metric.record_count),
            yoy_change_rate: format_rate(t.yoy_change_rate),
            total_change_rate: format_rate(t.total_change_rate),
            rank: or_placeholder(t.rank, |r| r.to_string()),
        })
        .map(refill_trend_row)
        .collect()
}

/// Re-apply placeholder substitution to an already-rendered row.
pub fn refill_trend_row(row: TrendRow) -> TrendRow {
    TrendRow {
        group: fill_missing(row.group),
        period: fill_missing(row.period),
        avg_unit_price: fill_missing(row.avg_unit_price),
        record_count: fill_missing(row.record_count),
        yoy_change_rate: fill_missing(row.yoy_change_rate),
        total_change_rate: fill_missing(row.total_change_rate),
        rank: fill_missing(row.rank),
    }
}

pub fn format_groups(groups: &[RankedGroup]) -> Vec<RankingRow> {
    groups
        .iter()
        .map(|g| RankingRow {
            rank: or_placeholder(g.rank, |r| r.to_string()),
            group: fill_missing(g.group_key.to_string()),
            periods: if g.first_period == g.last_period {
                g.first_period.to_string()
            } else {
                format!("{}-{}", g.first_period, g.last_period)
            },
            transaction_count: format_int(g.transaction_count),
            latest_avg_unit_price: format_price(g.latest_avg_unit_price),
            total_change_rate: format_rate(g.total_change_rate),
        })
        .collect()
}

pub fn format_search(records: &[&TransactionRecord]) -> Vec<SearchRow> {
    records
        .iter()
        .map(|r| SearchRow {
            district: fill_missing(r.district.clone()),
            subdivision: fill_missing(r.legal_subdivision.clone()),
            building_name: fill_missing(r.building_name.clone()),
            amount: or_placeholder(r.amount, format_int),
            building_area: or_placeholder(r.building_area, |a| format_number(a, 2)),
            construction_year: or_placeholder(r.construction_year, |y| y.to_string()),
            building_use: fill_missing(r.building_use.clone()),
        })
        .collect()
}

pub fn format_parking(records: &[ParkingRecord]) -> Vec<ParkingRow> {
    records
        .iter()
        .map(|p| ParkingRow {
            name: fill_missing(p.name.clone()),
            address: fill_missing(p.address.clone()),
            facility_type: p.facility_type.to_string(),
            total_spaces: format_int(p.total_spaces),
            current_occupancy: format_int(p.current_occupancy),
            available_spaces: format_int(p.available_spaces),
            base_rate: or_placeholder(p.base_rate, format_int),
            region: fill_missing(p.region.clone()),
            sub_region: fill_missing(p.sub_region.clone().unwrap_or_default()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupKey, PeriodMetric};

    fn trend(yoy: Option<f64>, total: Option<f64>, rank: Option<u32>) -> TrendRecord {
        TrendRecord {
            metric: PeriodMetric {
                group_key: GroupKey(vec!["A".into()]),
                period: 2023,
                avg_unit_price: 1_199_999.6,
                record_count: 1_234,
            },
            yoy_change_rate: yoy,
            total_change_rate: total,
            rank,
        }
    }

    #[test]
    fn undefined_values_become_placeholder() {
        let rows = format_trends(&[trend(None, None, None)]);
        assert_eq!(rows[0].yoy_change_rate, "-");
        assert_eq!(rows[0].total_change_rate, "-");
        assert_eq!(rows[0].rank, "-");
        assert_eq!(rows[0].avg_unit_price, "1,200,000");
        assert_eq!(rows[0].record_count, "1,234");
    }

    #[test]
    fn defined_values_are_kept() {
        let rows = format_trends(&[trend(Some(20.0), Some(-3.5), Some(2))]);
        assert_eq!(rows[0].yoy_change_rate, "20.00");
        assert_eq!(rows[0].total_change_rate, "-3.50");
        assert_eq!(rows[0].rank, "2");
    }

    #[test]
    fn literal_null_words_survive_search_rendering() {
        let rec = TransactionRecord {
            district: "도봉구".into(),
            building_name: "None".into(),
            building_use: "null".into(),
            ..Default::default()
        };
        let rows = format_search(&[&rec]);
        assert_eq!(rows[0].building_name, "None");
        assert_eq!(rows[0].building_use, "null");
        assert_eq!(rows[0].subdivision, "-");
        assert_eq!(rows[0].amount, "-");
    }

    #[test]
    fn negative_zero_rate_renders_unsigned() {
        assert_eq!(format_rate(Some(-0.0)), "0.00");
        assert_eq!(format_rate(Some(-0.5)), "-0.50");
    }

    #[test]
    fn refilling_is_idempotent() {
        let once = format_trends(&[trend(Some(0.0), None, Some(1)), trend(None, Some(1.0), None)]);
        let twice: Vec<TrendRow> = once.iter().cloned().map(refill_trend_row).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn fill_missing_only_replaces_blank_cells() {
        assert_eq!(fill_missing("  ".into()), "-");
        assert_eq!(fill_missing("".into()), "-");
        assert_eq!(fill_missing("None".into()), "None");
        assert_eq!(fill_missing("null".into()), "null");
        assert_eq!(fill_missing("NaN".into()), "NaN");
        assert_eq!(fill_missing("-".into()), "-");
        assert_eq!(fill_missing("방학동".into()), "방학동");
    }
}
