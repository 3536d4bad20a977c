use super::render_with;
use crate::hooks::ApiState;
use crate::utils::time::format_clock;
use jiff::tz::TimeZone;
use payloads::HourlyOrders;

pub const PATH: &str = "/api/orders_per_hour";

/// How busy an hour was relative to the busiest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Activity {
    pub fn from_percentage(percentage: u64) -> Self {
        match percentage {
            p if p > 75 => Self::VeryHigh,
            p if p > 50 => Self::High,
            p if p > 25 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

/// `count` as a whole percentage of `max`, rounded half up.
pub fn percentage_of(count: u64, max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    (count * 200 + max) / (2 * max)
}

pub fn render(state: &ApiState, tz: &TimeZone) -> String {
    render_with(state, "orders per hour", |entries: &Vec<HourlyOrders>| {
        render_hours(entries, tz)
    })
}

pub fn render_hours(entries: &[HourlyOrders], tz: &TimeZone) -> String {
    if entries.is_empty() {
        return "No orders in this time range.".to_string();
    }
    let max = entries.iter().map(|entry| entry.order_count).max().unwrap_or(0);
    let total: u64 = entries.iter().map(|entry| entry.order_count).sum();

    let mut lines = vec![format!("Total: {total}")];
    for entry in entries {
        let percentage = percentage_of(entry.order_count, max);
        let noun = if entry.order_count == 1 { "order" } else { "orders" };
        lines.push(format!(
            "{}  {:>4} {noun:<6}  {percentage:>3}%  {}",
            format_clock(entry.hour, tz),
            entry.order_count,
            Activity::from_percentage(percentage).label()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::FetchState;
    use serde_json::json;

    #[test]
    fn percentages_round_half_up() {
        assert_eq!(percentage_of(5, 8), 63);
        assert_eq!(percentage_of(2, 8), 25);
        assert_eq!(percentage_of(8, 8), 100);
        assert_eq!(percentage_of(3, 0), 0);
    }

    #[test]
    fn activity_bands_are_exclusive_at_boundaries() {
        assert_eq!(Activity::from_percentage(25), Activity::Low);
        assert_eq!(Activity::from_percentage(26), Activity::Moderate);
        assert_eq!(Activity::from_percentage(51), Activity::High);
        assert_eq!(Activity::from_percentage(75), Activity::High);
        assert_eq!(Activity::from_percentage(76), Activity::VeryHigh);
    }

    #[test]
    fn renders_each_hour_relative_to_busiest() {
        let state = ApiState {
            data: FetchState::Fetched(json!([
                {"hour": "2025-05-06T09:00:00Z", "order_count": 2},
                {"hour": "2025-05-06T10:00:00Z", "order_count": 8},
                {"hour": "2025-05-06T11:00:00Z", "order_count": 1}
            ])),
            loading: false,
            error: None,
        };
        assert_eq!(
            render(&state, &TimeZone::UTC),
            "Total: 11\n\
             09:00     2 orders   25%  low\n\
             10:00     8 orders  100%  very high\n\
             11:00     1 order    13%  low"
        );
    }

    #[test]
    fn empty_range() {
        assert_eq!(
            render_hours(&[], &TimeZone::UTC),
            "No orders in this time range."
        );
    }
}
