use crate::payload::MetricRecord;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

const REPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a delivery attempt ended. Never an error: the scheduler moves
/// on to the next cycle in all three cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Delivered,
    Rejected(u16),
    Unreachable,
}

/// Serializes the record and performs a single POST. At most one
/// delivery attempt per cycle; no retries, no buffering.
pub async fn report(client: &Client, endpoint: &str, record: &MetricRecord) -> ReportOutcome {
    let result = client
        .post(endpoint)
        .timeout(REPORT_TIMEOUT)
        .json(record)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            info!(
                machine = %record.machine_name,
                cpu_usage = record.cpu_usage,
                total_ram = %record.total_ram,
                "metrics delivered"
            );
            ReportOutcome::Delivered
        }
        Ok(response) => {
            let status = response.status().as_u16();
            warn!(status, "collector rejected metrics");
            ReportOutcome::Rejected(status)
        }
        Err(err) => {
            warn!(endpoint = %endpoint, error = %err, "collector unreachable");
            ReportOutcome::Unreachable
        }
    }
}
