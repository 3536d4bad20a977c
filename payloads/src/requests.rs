use jiff::civil::Date;
use jiff::{ToSpan, Zoned};
use serde::{Deserialize, Serialize};

/// Number of days covered by the default invoice search.
pub const DEFAULT_INVOICE_DAYS: i64 = 3;

/// Inclusive date range for the issued invoices listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRange {
    pub from: Date,
    pub to: Date,
}

impl InvoiceRange {
    /// The last [`DEFAULT_INVOICE_DAYS`] days, ending on `today`.
    pub fn ending_on(today: Date) -> Self {
        let from = today
            .checked_sub(DEFAULT_INVOICE_DAYS.days())
            .unwrap_or(today);
        Self { from, to: today }
    }

    pub fn ending_today() -> Self {
        Self::ending_on(Zoned::now().date())
    }

    /// Backend path for this range. Dates go out as `dd-mm-yyyy`.
    pub fn path(&self) -> String {
        format!(
            "/api/facturas-emitidas?fromDate={}&toDate={}",
            backend_date(self.from),
            backend_date(self.to)
        )
    }
}

fn backend_date(date: Date) -> String {
    date.strftime("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn default_range_covers_three_days() {
        let range = InvoiceRange::ending_on(date(2025, 5, 2));
        assert_eq!(range.from, date(2025, 4, 29));
        assert_eq!(range.to, date(2025, 5, 2));
    }

    #[test]
    fn path_uses_day_first_dates() {
        let range = InvoiceRange {
            from: date(2025, 5, 1),
            to: date(2025, 5, 4),
        };
        assert_eq!(
            range.path(),
            "/api/facturas-emitidas?fromDate=01-05-2025&toDate=04-05-2025"
        );
    }
}
