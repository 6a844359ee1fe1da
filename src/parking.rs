//! Public parking supply: on-street deduplication, merge with off-street
//! lots, and availability.

use crate::filter::{matches_text, non_blank};
use crate::types::{FacilityType, ParkingRecord, ParkingSource};
use std::collections::{HashMap, HashSet};

/// Optional exact-match region / sub-region restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilter {
    pub region: Option<String>,
    pub sub_region: Option<String>,
}

impl RegionFilter {
    pub fn from_inputs(region: Option<&str>, sub_region: Option<&str>) -> Self {
        Self { region: non_blank(region), sub_region: non_blank(sub_region) }
    }

    pub fn matches(&self, rec: &ParkingRecord) -> bool {
        matches_text(self.region.as_deref(), &rec.region)
            && match (&self.sub_region, &rec.sub_region) {
                (None, _) => true,
                (Some(want), Some(have)) => want == have,
                (Some(_), None) => false,
            }
    }
}

/// First whitespace token is the region, the second the sub-region.
pub fn split_region(address: &str) -> (String, Option<String>) {
    let mut tokens = address.split_whitespace();
    let region = tokens.next().unwrap_or_default().to_string();
    let sub_region = tokens.next().map(str::to_string);
    (region, sub_region)
}

fn to_record(src: &ParkingSource, facility_type: FacilityType, total_spaces: i64) -> ParkingRecord {
    let (region, sub_region) = split_region(&src.address);
    let current_occupancy = src.current_parking.unwrap_or(0);
    ParkingRecord {
        name: src.name.clone(),
        address: src.address.clone(),
        region,
        sub_region,
        facility_type,
        total_spaces,
        current_occupancy,
        available_spaces: total_spaces - current_occupancy,
        base_rate: src.basic_rate,
    }
}

/// Build the merged supply table, largest capacity first.
///
/// Off-street lots keep their stored capacity. On-street rows are one per
/// managed segment, so a curbside facility's capacity is the number of rows
/// sharing its address and only the first row per address is kept.
pub fn normalize_supply(sources: &[ParkingSource]) -> Vec<ParkingRecord> {
    let mut off_street = Vec::new();
    let mut on_street_rows = Vec::new();
    let mut skipped = 0usize;
    for src in sources {
        match FacilityType::classify(&src.type_name) {
            Some(FacilityType::OffStreet) => off_street.push(src),
            Some(FacilityType::OnStreet) => on_street_rows.push(src),
            None => skipped += 1,
        }
    }

    let mut segments: HashMap<&str, i64> = HashMap::new();
    for src in &on_street_rows {
        *segments.entry(src.address.as_str()).or_insert(0) += 1;
    }
    let mut seen: HashSet<&str> = HashSet::new();
    let mut on_street: Vec<ParkingRecord> = on_street_rows
        .iter()
        .filter(|src| seen.insert(src.address.as_str()))
        .map(|src| {
            let count = segments.get(src.address.as_str()).copied().unwrap_or(1);
            to_record(src, FacilityType::OnStreet, count)
        })
        .collect();
    on_street.sort_by(|a, b| b.total_spaces.cmp(&a.total_spaces));

    let mut merged: Vec<ParkingRecord> = off_street
        .iter()
        .map(|src| to_record(src, FacilityType::OffStreet, src.total_spaces.unwrap_or(0)))
        .collect();
    merged.extend(on_street);
    merged.sort_by(|a, b| b.total_spaces.cmp(&a.total_spaces));

    log::debug!(
        "parking supply: {} off-street, {} on-street rows -> {} facilities, {} rows of other types skipped",
        off_street.len(),
        on_street_rows.len(),
        merged.len(),
        skipped
    );
    merged
}

pub fn filter_supply(records: Vec<ParkingRecord>, filter: &RegionFilter) -> Vec<ParkingRecord> {
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
