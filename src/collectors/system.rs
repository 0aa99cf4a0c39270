use crate::collectors::{HardwareSnapshot, HardwareUnit, SensorKind, SensorReading, UnitKind};
use std::process::Command;
use sysinfo::{ComponentExt, CpuExt, System, SystemExt};
use thiserror::Error;
use tracing::debug;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("hardware enumeration returned no CPU; re-run with elevated privileges")]
    NoCpuVisible,
}

/// Owns the hardware handle for the lifetime of the process. Acquired
/// once at startup; `snapshot` refreshes live values every cycle.
pub struct SystemProbe {
    system: System,
}

impl SystemProbe {
    pub fn open() -> Result<Self, ProbeError> {
        let mut system = System::new_all();
        system.refresh_cpu();
        if system.cpus().is_empty() {
            return Err(ProbeError::NoCpuVisible);
        }
        Ok(Self { system })
    }

    /// Refreshes every unit's live values and rebuilds the unit tree.
    /// Readings taken before a refresh would be stale, so this is the
    /// only way to obtain a snapshot.
    pub fn snapshot(&mut self) -> HardwareSnapshot {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_components_list();
        self.system.refresh_components();

        let mut units = vec![cpu_unit(&self.system), memory_unit(&self.system)];
        units.extend(gpu_units(&self.system));

        debug!(units = units.len(), "hardware snapshot rebuilt");
        HardwareSnapshot {
            host_name: self.system.host_name(),
            units,
        }
    }
}

fn cpu_unit(system: &System) -> HardwareUnit {
    let mut sensors = Vec::new();

    let usage = if system.cpus().is_empty() {
        0.0
    } else {
        let sum: f32 = system.cpus().iter().map(|c| c.cpu_usage()).sum();
        (sum / system.cpus().len() as f32) as f64
    };
    sensors.push(SensorReading {
        kind: SensorKind::Load,
        name: "CPU Total".to_string(),
        value: usage,
    });

    // Component labels pass through unchanged: coretemp exposes
    // "Package id 0" and "Core N", k10temp exposes "Tdie"/"Tctl", which
    // is exactly what the selection heuristics key on.
    for component in system.components() {
        let value = component.temperature() as f64;
        if value > 0.0 && is_cpu_temp_label(component.label()) {
            sensors.push(SensorReading {
                kind: SensorKind::Temperature,
                name: component.label().to_string(),
                value,
            });
        }
    }

    HardwareUnit {
        kind: UnitKind::Cpu,
        sensors,
    }
}

fn memory_unit(system: &System) -> HardwareUnit {
    let used_gb = system.used_memory() as f64 / BYTES_PER_GIB;
    let available_gb = system.available_memory() as f64 / BYTES_PER_GIB;

    HardwareUnit {
        kind: UnitKind::Memory,
        sensors: vec![
            SensorReading {
                kind: SensorKind::Data,
                name: "Memory Used".to_string(),
                value: used_gb,
            },
            SensorReading {
                kind: SensorKind::Data,
                name: "Memory Available".to_string(),
                value: available_gb,
            },
        ],
    }
}

fn gpu_units(system: &System) -> Vec<HardwareUnit> {
    let nvidia = collect_nvidia_smi();
    if !nvidia.is_empty() {
        return nvidia;
    }

    let mut units = Vec::new();
    for component in system.components() {
        let label_lower = component.label().to_lowercase();
        let kind = if label_lower.contains("nvidia") {
            UnitKind::GpuNvidia
        } else if label_lower.contains("amdgpu") || label_lower.contains("radeon") {
            UnitKind::GpuAmd
        } else if label_lower.contains("gpu") {
            UnitKind::GpuIntel
        } else {
            continue;
        };

        let value = component.temperature() as f64;
        if value <= 0.0 {
            continue;
        }
        units.push(HardwareUnit {
            kind,
            sensors: vec![SensorReading {
                kind: SensorKind::Temperature,
                name: "GPU Core".to_string(),
                value,
            }],
        });
    }

    units
}

fn collect_nvidia_smi() -> Vec<HardwareUnit> {
    let output = run_nvidia_smi(&[
        "--query-gpu=name,temperature.gpu",
        "--format=csv,noheader,nounits",
    ]);

    let Some(output) = output else {
        return Vec::new();
    };
    if !output.status.success() {
        return Vec::new();
    }

    let Ok(text) = String::from_utf8(output.stdout) else {
        return Vec::new();
    };

    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(',').map(|v| v.trim()).collect();
            if parts.len() < 2 {
                return None;
            }

            let temp = parse_f64_loose(parts[1])?;
            if temp <= 0.0 {
                return None;
            }

            Some(HardwareUnit {
                kind: UnitKind::GpuNvidia,
                sensors: vec![SensorReading {
                    kind: SensorKind::Temperature,
                    name: "GPU Core".to_string(),
                    value: temp,
                }],
            })
        })
        .collect()
}

fn run_nvidia_smi(args: &[&str]) -> Option<std::process::Output> {
    if let Ok(output) = Command::new("nvidia-smi").args(args).output() {
        return Some(output);
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(output) = Command::new(r"C:\Windows\System32\nvidia-smi.exe")
            .args(args)
            .output()
        {
            return Some(output);
        }
    }

    None
}

fn is_cpu_temp_label(label: &str) -> bool {
    let s = label.to_lowercase();
    let gpu_markers = ["gpu", "nvidia", "amdgpu", "radeon"];
    if gpu_markers.iter().any(|m| s.contains(m)) {
        return false;
    }

    let cpu_markers = [
        "coretemp", "k10temp", "cpu", "package", "tdie", "tctl", "core",
    ];
    cpu_markers.iter().any(|m| s.contains(m))
}

fn parse_f64_loose(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return Some(v);
    }

    trimmed.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_labels_match_and_gpu_labels_do_not() {
        assert!(is_cpu_temp_label("coretemp Package id 0"));
        assert!(is_cpu_temp_label("k10temp Tdie"));
        assert!(is_cpu_temp_label("Core 3"));
        assert!(!is_cpu_temp_label("amdgpu edge"));
        assert!(!is_cpu_temp_label("nvidia gpu"));
        assert!(!is_cpu_temp_label("nvme composite"));
    }

    #[test]
    fn loose_parse_accepts_comma_decimals() {
        assert_eq!(parse_f64_loose("65.5"), Some(65.5));
        assert_eq!(parse_f64_loose("65,5"), Some(65.5));
        assert_eq!(parse_f64_loose("n/a"), None);
    }
}
