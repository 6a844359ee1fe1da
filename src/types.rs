use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::filter::FilterSpec;

/// One CSV row of the transaction table, every cell kept as raw text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawTransactionRow {
    pub reception_year: Option<String>,
    pub district_name: Option<String>,
    pub legal_dong_name: Option<String>,
    pub building_name: Option<String>,
    pub contract_date: Option<String>,
    pub amount: Option<String>,
    pub building_area: Option<String>,
    pub construction_year: Option<String>,
    pub building_use: Option<String>,
}

/// One CSV row of the public parking roster.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawParkingRow {
    pub parking_name: Option<String>,
    pub address: Option<String>,
    pub parking_type_name: Option<String>,
    pub total_spaces: Option<String>,
    pub current_parking: Option<String>,
    pub basic_rate: Option<String>,
}

/// A sale transaction. `amount` is in units of 10,000 won, `building_area` in m².
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionRecord {
    pub district: String,
    pub legal_subdivision: String,
    pub reception_year: Option<i32>,
    pub contract_date: Option<NaiveDate>,
    pub construction_year: Option<i32>,
    pub building_name: String,
    pub building_use: String,
    pub amount: Option<i64>,
    pub building_area: Option<f64>,
}

/// A parking roster entry as stored, before any capacity accounting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParkingSource {
    pub name: String,
    pub address: String,
    pub type_name: String,
    pub total_spaces: Option<i64>,
    pub current_parking: Option<i64>,
    pub basic_rate: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FacilityType {
    OffStreet,
    OnStreet,
}

impl FacilityType {
    /// Classify a roster type name. Anything that is neither a lot nor a
    /// curbside segment is not counted as public supply.
    pub fn classify(type_name: &str) -> Option<Self> {
        let lower = type_name.to_lowercase();
        if type_name.contains("노외") || lower.contains("off-street") {
            Some(Self::OffStreet)
        } else if type_name.contains("노상") || lower.contains("on-street") {
            Some(Self::OnStreet)
        } else {
            None
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffStreet => f.write_str("off-street"),
            Self::OnStreet => f.write_str("on-street"),
        }
    }
}

/// Normalized parking facility. `available_spaces` is not clamped and may be negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingRecord {
    pub name: String,
    pub address: String,
    pub region: String,
    pub sub_region: Option<String>,
    pub facility_type: FacilityType,
    pub total_spaces: i64,
    pub current_occupancy: i64,
    pub available_spaces: i64,
    pub base_rate: Option<i64>,
}

/// Attribute a transaction can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    District,
    Subdivision,
    BuildingUse,
    BuildingName,
}

impl Dimension {
    pub fn value<'a>(&self, rec: &'a TransactionRecord) -> &'a str {
        match self {
            Self::District => &rec.district,
            Self::Subdivision => &rec.legal_subdivision,
            Self::BuildingUse => &rec.building_use,
            Self::BuildingName => &rec.building_name,
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "district" | "gu" => Ok(Self::District),
            "subdivision" | "dong" => Ok(Self::Subdivision),
            "building_use" | "use" => Ok(Self::BuildingUse),
            "building_name" | "building" => Ok(Self::BuildingName),
            other => Err(format!("unknown dimension '{}'", other)),
        }
    }
}

/// Which year a transaction is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodField {
    #[default]
    ReceptionYear,
    ContractYear,
    ConstructionYear,
}

impl PeriodField {
    pub fn value(&self, rec: &TransactionRecord) -> Option<i32> {
        match self {
            Self::ReceptionYear => rec.reception_year,
            Self::ContractYear => crate::util::year_of(rec.contract_date),
            Self::ConstructionYear => rec.construction_year,
        }
    }
}

impl FromStr for PeriodField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "reception_year" | "reception" => Ok(Self::ReceptionYear),
            "contract_year" | "contract" => Ok(Self::ContractYear),
            "construction_year" | "construction" => Ok(Self::ConstructionYear),
            other => Err(format!("unknown period field '{}'", other)),
        }
    }
}

/// Tie-breaker applied after rank when ordering trend rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondarySort {
    #[default]
    Group,
    Period,
}

impl FromStr for SecondarySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "group" | "dimension" => Ok(Self::Group),
            "period" | "year" => Ok(Self::Period),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Ordered tuple of dimension values identifying one trend series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct GroupKey(pub Vec<String>);

impl GroupKey {
    pub fn of(rec: &TransactionRecord, dims: &[Dimension]) -> Self {
        Self(dims.iter().map(|d| d.value(rec).to_string()).collect())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Everything the price-trend pipeline needs from the caller.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsRequest {
    pub filter: FilterSpec,
    pub dimensions: Vec<Dimension>,
    pub period: PeriodField,
    /// Restart ranking for each distinct value of this dimension.
    pub rank_within: Option<Dimension>,
    /// Keep only this subdivision's rows, applied after ranking so ranks
    /// still reflect the whole filtered population.
    pub focus_subdivision: Option<String>,
    pub sort_by: SecondarySort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMetric {
    pub group_key: GroupKey,
    pub period: i32,
    pub avg_unit_price: f64,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRecord {
    pub metric: PeriodMetric,
    pub yoy_change_rate: Option<f64>,
    pub total_change_rate: Option<f64>,
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedGroup {
    pub group_key: GroupKey,
    pub first_period: i32,
    pub last_period: i32,
    pub transaction_count: usize,
    pub latest_avg_unit_price: f64,
    pub total_change_rate: Option<f64>,
    pub rank: Option<u32>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct TrendRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "AvgPricePerSqm")]
    #[tabled(rename = "AvgPricePerSqm")]
    pub avg_unit_price: String,
    #[serde(rename = "Transactions")]
    #[tabled(rename = "Transactions")]
    pub record_count: String,
    #[serde(rename = "YoYChange")]
    #[tabled(rename = "YoYChange")]
    pub yoy_change_rate: String,
    #[serde(rename = "TotalChange")]
    #[tabled(rename = "TotalChange")]
    pub total_change_rate: String,
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Periods")]
    #[tabled(rename = "Periods")]
    pub periods: String,
    #[serde(rename = "Transactions")]
    #[tabled(rename = "Transactions")]
    pub transaction_count: String,
    #[serde(rename = "LatestPricePerSqm")]
    #[tabled(rename = "LatestPricePerSqm")]
    pub latest_avg_unit_price: String,
    #[serde(rename = "TotalChange")]
    #[tabled(rename = "TotalChange")]
    pub total_change_rate: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct SearchRow {
    #[serde(rename = "District")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "Subdivision")]
    #[tabled(rename = "Subdivision")]
    pub subdivision: String,
    #[serde(rename = "BuildingName")]
    #[tabled(rename = "BuildingName")]
    pub building_name: String,
    #[serde(rename = "Amount")]
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "BuildingArea")]
    #[tabled(rename = "BuildingArea")]
    pub building_area: String,
    #[serde(rename = "ConstructionYear")]
    #[tabled(rename = "ConstructionYear")]
    pub construction_year: String,
    #[serde(rename = "BuildingUse")]
    #[tabled(rename = "BuildingUse")]
    pub building_use: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ParkingRow {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    #[tabled(rename = "Address")]
    pub address: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub facility_type: String,
    #[serde(rename = "TotalSpaces")]
    #[tabled(rename = "TotalSpaces")]
    pub total_spaces: String,
    #[serde(rename = "Occupied")]
    #[tabled(rename = "Occupied")]
    pub current_occupancy: String,
    #[serde(rename = "Available")]
    #[tabled(rename = "Available")]
    pub available_spaces: String,
    #[serde(rename = "BaseRate")]
    #[tabled(rename = "BaseRate")]
    pub base_rate: String,
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "SubRegion")]
    #[tabled(rename = "SubRegion")]
    pub sub_region: String,
}
