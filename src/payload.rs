use crate::readings::SensorReadings;
use chrono::{DateTime, Local};
use serde::Serialize;

/// One reported sample. Built fresh every cycle and dropped once the
/// reporter is done with it, whatever the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRecord {
    #[serde(rename = "MachineName")]
    pub machine_name: String,
    #[serde(rename = "CpuUsage")]
    pub cpu_usage: f64,
    #[serde(rename = "CpuTemp")]
    pub cpu_temp: f64,
    #[serde(rename = "GpuTemp")]
    pub gpu_temp: f64,
    #[serde(rename = "NicSpeed")]
    pub nic_speed: String,
    #[serde(rename = "TotalRam")]
    pub total_ram: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Local>,
}

impl MetricRecord {
    /// Pure aggregation of already-selected readings; cannot fail.
    pub fn assemble(
        machine_name: String,
        readings: SensorReadings,
        nic_speed: String,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            machine_name,
            cpu_usage: readings.cpu_usage_percent,
            cpu_temp: readings.cpu_temperature_c,
            gpu_temp: readings.gpu_temperature_c,
            nic_speed,
            total_ram: readings.total_memory_description,
            timestamp,
        }
    }
}
