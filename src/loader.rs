use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::types::{ParkingSource, RawParkingRow, RawTransactionRow, TransactionRecord};
use crate::util::{clean_text, parse_date_safe, parse_f64_safe, parse_i32_safe, parse_i64_safe};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

fn read_rows<T, R, F, O>(rdr: R, mut convert: F) -> Result<(Vec<O>, LoadReport)>
where
    T: DeserializeOwned,
    R: Read,
    F: FnMut(T) -> O,
{
    let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(rdr);
    let mut report = LoadReport::default();
    let mut out = Vec::new();
    for result in rdr.deserialize::<T>() {
        report.total_rows += 1;
        match result {
            Ok(row) => out.push(convert(row)),
            Err(e) => {
                log::warn!("skipping row {}: {}", report.total_rows, e);
                report.parse_errors += 1;
            }
        }
    }
    report.loaded_rows = out.len();
    Ok((out, report))
}

// Numeric cells that fail to parse become `None`; the analytic stages decide
// what a missing value means.
fn clean_transaction(row: RawTransactionRow) -> TransactionRecord {
    TransactionRecord {
        district: clean_text(row.district_name),
        legal_subdivision: clean_text(row.legal_dong_name),
        reception_year: parse_i32_safe(row.reception_year.as_deref()),
        contract_date: parse_date_safe(row.contract_date.as_deref()),
        construction_year: parse_i32_safe(row.construction_year.as_deref()),
        building_name: clean_text(row.building_name),
        building_use: clean_text(row.building_use),
        amount: parse_i64_safe(row.amount.as_deref()),
        building_area: parse_f64_safe(row.building_area.as_deref()),
    }
}

fn clean_parking(row: RawParkingRow) -> ParkingSource {
    ParkingSource {
        name: clean_text(row.parking_name),
        address: clean_text(row.address),
        type_name: clean_text(row.parking_type_name),
        total_spaces: parse_i64_safe(row.total_spaces.as_deref()),
        current_parking: parse_i64_safe(row.current_parking.as_deref()),
        basic_rate: parse_i64_safe(row.basic_rate.as_deref()),
    }
}

pub fn read_transactions<R: Read>(rdr: R) -> Result<(Vec<TransactionRecord>, LoadReport)> {
    read_rows(rdr, clean_transaction)
}

pub fn read_parking<R: Read>(rdr: R) -> Result<(Vec<ParkingSource>, LoadReport)> {
    read_rows(rdr, clean_parking)
}

pub fn load_transactions(path: &Path) -> Result<(Vec<TransactionRecord>, LoadReport)> {
    read_transactions(std::fs::File::open(path)?)
}

pub fn load_parking(path: &Path) -> Result<(Vec<ParkingSource>, LoadReport)> {
    read_parking(std::fs::File::open(path)?)
}

/// Load both tables. A missing parking file yields an empty roster so the
/// price reports still work on their own.
pub fn load_snapshot(transactions: &Path, parking: &Path) -> Result<(Snapshot, LoadReport, LoadReport)> {
    let (tx, tx_report) = load_transactions(transactions)?;
    let (pk, pk_report) = if parking.exists() {
        load_parking(parking)?
    } else {
        log::info!("no parking roster at {}, continuing without it", parking.display());
        (Vec::new(), LoadReport::default())
    };
    Ok((Snapshot::new(tx, pk), tx_report, pk_report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_transactions_with_forgiving_cells() {
        let csv = "\
ret_id,reception_year,district_name,legal_dong_name,building_name,contract_date,amount,building_area,construction_year,building_use,floor
1,2023, 도봉구 ,방학동,현대,20230105,\"12,000\",84.97,1999,아파트,3
2,2022,도봉구,창동,,20220230,n/a,,,,
";
        let (rows, report) = read_transactions(csv.as_bytes()).unwrap();
        assert_eq!(report, LoadReport { total_rows: 2, loaded_rows: 2, parse_errors: 0 });

        assert_eq!(rows[0].district, "도봉구");
        assert_eq!(rows[0].amount, Some(12_000));
        assert_eq!(rows[0].building_area, Some(84.97));
        assert_eq!(rows[0].reception_year, Some(2023));
        assert_eq!(crate::util::year_of(rows[0].contract_date), Some(2023));

        assert_eq!(rows[1].amount, None);
        assert_eq!(rows[1].building_area, None);
        assert_eq!(rows[1].contract_date, None);
        assert_eq!(rows[1].building_name, "");
    }

    #[test]
    fn reads_parking_roster() {
        let csv = "\
parking_code,parking_name,address,parking_type_name,total_spaces,current_parking,basic_rate
171721,방학동 공영,도봉구 방학동 123,노외 주차장,120,30,300
";
        let (rows, report) = read_parking(csv.as_bytes()).unwrap();
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(rows[0].type_name, "노외 주차장");
        assert_eq!(rows[0].total_spaces, Some(120));
        assert_eq!(rows[0].current_parking, Some(30));
        assert_eq!(rows[0].basic_rate, Some(300));
    }
}
