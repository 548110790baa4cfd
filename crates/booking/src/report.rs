//! Administrative reporting over the order ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ledger::OrderLedger;

/// Number of live orders per purchase date (UTC), oldest date first.
pub fn sales_per_day(ledger: &OrderLedger) -> BTreeMap<NaiveDate, usize> {
    let mut sales = BTreeMap::new();
    for order in ledger.iter() {
        *sales.entry(order.purchase_date()).or_insert(0) += 1;
    }
    sales
}
