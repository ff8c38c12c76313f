use serde::{Deserialize, Serialize};

/// Fixed hourly rate used for every estimate
pub const HOURLY_RATE: f64 = 500.0;

/// What the estimation service returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeResult {
    pub hours: f64,
    pub rationale: String,
}

/// Display form of an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub estimated_time: String,
    pub estimated_fee: f64,
    pub rationale: String,
}

impl FeeEstimate {
    pub fn from_result(result: FeeResult, hourly_rate: f64) -> Self {
        Self {
            estimated_time: format!("{} hours", result.hours),
            estimated_fee: result.hours * hourly_rate,
            rationale: result.rationale,
        }
    }

    pub fn formatted_fee(&self) -> String {
        format!("{:.2}", self.estimated_fee)
    }
}

impl From<FeeResult> for FeeEstimate {
    fn from(result: FeeResult) -> Self {
        Self::from_result(result, HOURLY_RATE)
    }
}
