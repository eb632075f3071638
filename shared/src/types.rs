//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Date range for report queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// Reporting timeframe granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::Yearly => "yearly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_default_is_monthly() {
        assert_eq!(Timeframe::default(), Timeframe::Monthly);
    }

    #[test]
    fn timeframe_parses_lowercase() {
        let tf: Timeframe = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(tf, Timeframe::Weekly);
        assert_eq!(tf.as_str(), "weekly");
    }
}
