use crate::model::ContributionCalendar;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Flatten a calendar into a date -> existing contribution count lookup.
///
/// Days appearing more than once keep the last count seen. An absent
/// calendar yields an empty lookup, so every day reads as zero.
pub fn reconcile(calendar: Option<&ContributionCalendar>) -> HashMap<NaiveDate, u32> {
    let mut counts = HashMap::new();
    let Some(calendar) = calendar else {
        return counts;
    };

    for day in calendar.days() {
        counts.insert(day.date, day.contribution_count);
    }
    counts
}
