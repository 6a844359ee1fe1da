//! Price-trend analytics over real-estate sale transactions, plus a public
//! parking supply table.
//!
//! Every pipeline takes an explicit [`Snapshot`] and returns typed rows;
//! undefined metrics stay `None` until [`format`] renders them.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod parking;
pub mod rank;
pub mod search;
pub mod snapshot;
pub mod trend;
pub mod types;
pub mod util;

pub use error::{Error, Result};
pub use filter::FilterSpec;
pub use parking::RegionFilter;
pub use snapshot::Snapshot;
pub use types::{
    AnalyticsRequest, Dimension, GroupKey, ParkingRecord, PeriodField, PeriodMetric, RankedGroup,
    SecondarySort, TransactionRecord, TrendRecord,
};

fn build_trends(snapshot: &Snapshot, request: &AnalyticsRequest) -> (Vec<TrendRecord>, Vec<RankedGroup>) {
    if request.filter.is_empty() {
        log::debug!("no filters given, using all {} records", snapshot.transactions.len());
    }
    let pred = request.filter.predicate();
    let priced = normalize::normalize(snapshot.transactions.iter().filter(|&r| pred(r)));
    let metrics = aggregate::aggregate(&priced, &request.dimensions, request.period);
    let mut trends = trend::analyze(&metrics);

    let mut groups = rank::collapse(&trends);
    let partition = request
        .rank_within
        .and_then(|d| request.dimensions.iter().position(|x| *x == d));
    rank::dense_rank(&mut groups, partition);
    rank::apply_ranks(&mut trends, &groups);

    if let Some(focus) = focus_matcher(request) {
        trends.retain(|t| focus(&t.metric.group_key));
        groups.retain(|g| focus(&g.group_key));
    }

    log::info!(
        "trend pipeline: {} priced records -> {} period rows in {} groups",
        priced.len(),
        trends.len(),
        groups.len()
    );
    (trends, groups)
}

/// Post-ranking subdivision restriction. Needs `Subdivision` in the grouping;
/// otherwise it is ignored with a warning.
fn focus_matcher(request: &AnalyticsRequest) -> Option<impl Fn(&GroupKey) -> bool + '_> {
    let focus = request.focus_subdivision.as_deref()?;
    let Some(pos) = request.dimensions.iter().position(|d| *d == Dimension::Subdivision) else {
        log::warn!("focus subdivision '{}' ignored: not grouped by subdivision", focus);
        return None;
    };
    Some(move |key: &GroupKey| key.0.get(pos).is_some_and(|v| v == focus))
}

/// One row per (group, period) with yoy and total change rates and the
/// group's dense rank, ordered by rank then `request.sort_by`.
pub fn run_analytics(snapshot: &Snapshot, request: &AnalyticsRequest) -> Vec<TrendRecord> {
    let (mut trends, _) = build_trends(snapshot, request);
    rank::sort_trends(&mut trends, request.sort_by);
    trends
}

/// One row per group, ordered by rank then group key.
pub fn run_group_ranking(snapshot: &Snapshot, request: &AnalyticsRequest) -> Vec<RankedGroup> {
    let (_, mut groups) = build_trends(snapshot, request);
    rank::sort_groups(&mut groups);
    groups
}

pub fn run_record_search<'a>(snapshot: &'a Snapshot, filter: &FilterSpec) -> Vec<&'a TransactionRecord> {
    search::search(snapshot, filter)
}

pub fn run_parking_supply(snapshot: &Snapshot, filter: &RegionFilter) -> Vec<ParkingRecord> {
    let supply = parking::normalize_supply(&snapshot.parking);
    let out = parking::filter_supply(supply, filter);
    log::info!("parking supply: {} facilities after region filter", out.len());
    out
}
