use crate::types::{ParkingSource, TransactionRecord};
use std::collections::BTreeSet;

/// Point-in-time copy of the backing tables, handed to every pipeline.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub transactions: Vec<TransactionRecord>,
    pub parking: Vec<ParkingSource>,
}

impl Snapshot {
    pub fn new(transactions: Vec<TransactionRecord>, parking: Vec<ParkingSource>) -> Self {
        Self { transactions, parking }
    }

    /// Sorted distinct district names.
    pub fn districts(&self) -> Vec<String> {
        distinct(self.transactions.iter().map(|r| r.district.as_str()))
    }

    /// Sorted distinct subdivisions recorded under `district`.
    pub fn subdivisions(&self, district: &str) -> Vec<String> {
        distinct(
            self.transactions
                .iter()
                .filter(|r| r.district == district)
                .map(|r| r.legal_subdivision.as_str()),
        )
    }

    /// Sorted distinct parking regions (first address token).
    pub fn parking_regions(&self) -> Vec<String> {
        distinct(self.parking.iter().filter_map(|p| p.address.split_whitespace().next()))
    }
}

fn distinct<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
