//! Insight extraction and persistence after a completed run.

use karmalens_memory::MemoryManager;
use log::info;

/// Marker phrase that triggers storing a derived engagement-pattern record.
pub const HIGH_ENGAGEMENT_MARKER: &str = "high engagement";

const HIGH_ENGAGEMENT_PATTERN_TYPE: &str = "high_engagement_indicators";
const HIGH_ENGAGEMENT_DETAILS: &str =
    "Analysis identified specific characteristics that lead to high engagement";

/// Whether the result text claims a high-engagement finding.
///
/// TODO: replace this substring probe with a structured signal in the model
/// output (a dedicated field in the expected-output contract) so phrasing
/// changes cannot silently stop pattern capture.
pub fn mentions_high_engagement(result: &str) -> bool {
    result.to_lowercase().contains(HIGH_ENGAGEMENT_MARKER)
}

/// Store the analysis result, plus a derived pattern record when the result
/// flags high engagement. Returns how many records were actually written;
/// store failures are absorbed by the manager.
pub async fn persist_insights(manager: &MemoryManager, result: &str) -> usize {
    let mut written = 0;

    if manager.store_analysis_result(result).await {
        written += 1;
    }

    if mentions_high_engagement(result) {
        info!("result flags high engagement, storing derived pattern");
        if manager
            .store_engagement_pattern(HIGH_ENGAGEMENT_PATTERN_TYPE, HIGH_ENGAGEMENT_DETAILS)
            .await
        {
            written += 1;
        }
    }

    written
}
