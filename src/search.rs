use crate::filter::FilterSpec;
use crate::snapshot::Snapshot;
use crate::types::TransactionRecord;

/// Transactions matching `filter`, in snapshot order. Unlike the trend
/// pipeline, records without a usable area are still returned.
pub fn search<'a>(snapshot: &'a Snapshot, filter: &FilterSpec) -> Vec<&'a TransactionRecord> {
    let pred = filter.predicate();
    let hits: Vec<&TransactionRecord> = snapshot.transactions.iter().filter(|&r| pred(r)).collect();
    log::debug!("search matched {} of {} records", hits.len(), snapshot.transactions.len());
    hits
}
