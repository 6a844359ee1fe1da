//! Sparse transaction filters compiled into a conjunctive predicate.

use crate::types::TransactionRecord;
use crate::util::parse_i64_safe;

/// Optional criteria supplied by the caller. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub district: Option<String>,
    pub subdivision: Option<String>,
    pub building_use: Option<String>,
    /// Inclusive ceiling on `amount` (10,000 won units).
    pub max_amount: Option<i64>,
}

impl FilterSpec {
    /// Build a filter from loosely-typed caller input. Blank text and an
    /// unparsable amount ceiling are treated as absent.
    pub fn from_inputs(
        district: Option<&str>,
        subdivision: Option<&str>,
        building_use: Option<&str>,
        max_amount: Option<&str>,
    ) -> Self {
        Self {
            district: non_blank(district),
            subdivision: non_blank(subdivision),
            building_use: non_blank(building_use),
            max_amount: parse_i64_safe(max_amount),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.district.is_none()
            && self.subdivision.is_none()
            && self.building_use.is_none()
            && self.max_amount.is_none()
    }

    pub fn matches(&self, rec: &TransactionRecord) -> bool {
        matches_text(self.district.as_deref(), &rec.district)
            && matches_text(self.subdivision.as_deref(), &rec.legal_subdivision)
            && matches_text(self.building_use.as_deref(), &rec.building_use)
            && self
                .max_amount
                .map_or(true, |cap| rec.amount.is_some_and(|a| a <= cap))
    }

    pub fn predicate(&self) -> impl Fn(&TransactionRecord) -> bool + '_ {
        move |rec| self.matches(rec)
    }
}

/// Exact-match test shared by the transaction and parking filters.
pub(crate) fn matches_text(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |w| w == actual)
}

pub(crate) fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
