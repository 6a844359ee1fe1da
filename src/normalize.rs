use crate::types::TransactionRecord;

/// A transaction paired with its price per m² in won.
#[derive(Debug, Clone, Copy)]
pub struct PricedRecord<'a> {
    pub record: &'a TransactionRecord,
    pub unit_price: f64,
}

/// `amount * 10000 / building_area`, or `None` when the area is missing or
/// non-positive or the amount is missing.
pub fn unit_price(rec: &TransactionRecord) -> Option<f64> {
    let area = rec.building_area.filter(|a| *a > 0.0 && a.is_finite())?;
    let amount = rec.amount?;
    Some(amount as f64 * 10_000.0 / area)
}

/// Price every record that can be priced; the rest are dropped silently.
pub fn normalize<'a, I>(records: I) -> Vec<PricedRecord<'a>>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut dropped = 0usize;
    let priced: Vec<PricedRecord<'a>> = records
        .into_iter()
        .filter_map(|record| match unit_price(record) {
            Some(unit_price) => Some(PricedRecord { record, unit_price }),
            None => {
                dropped += 1;
                None
            }
        })
        .collect();
    log::debug!("priced {} records, {} without usable amount/area", priced.len(), dropped);
    priced
}
