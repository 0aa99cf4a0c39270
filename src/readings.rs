use crate::collectors::{HardwareSnapshot, SensorKind, SensorReading, UnitKind};

/// Readings selected from one snapshot, already rounded for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReadings {
    pub cpu_usage_percent: f64,
    pub cpu_temperature_c: f64,
    pub gpu_temperature_c: f64,
    pub total_memory_description: String,
}

/// Applies the per-metric selection heuristics. Any metric without a
/// usable sensor degrades to its documented default instead of failing.
pub fn select_readings(snapshot: &HardwareSnapshot) -> SensorReadings {
    SensorReadings {
        cpu_usage_percent: round_one_decimal(cpu_load(snapshot)),
        cpu_temperature_c: cpu_temperature(snapshot).round(),
        gpu_temperature_c: gpu_temperature(snapshot).round(),
        total_memory_description: total_memory_description(snapshot),
    }
}

fn cpu_sensors(snapshot: &HardwareSnapshot) -> impl Iterator<Item = &SensorReading> {
    snapshot
        .units
        .iter()
        .filter(|u| u.kind == UnitKind::Cpu)
        .flat_map(|u| u.sensors.iter())
}

fn cpu_load(snapshot: &HardwareSnapshot) -> f64 {
    cpu_sensors(snapshot)
        .find(|s| s.kind == SensorKind::Load && s.name.contains("Total"))
        .map(|s| s.value)
        .unwrap_or(0.0)
}

fn cpu_temperature(snapshot: &HardwareSnapshot) -> f64 {
    let temperature = |s: &&SensorReading| s.kind == SensorKind::Temperature;

    // Package-level sensors are not exposed on all vendors; per-core
    // sensors usually are, hence the two-tier fallback.
    cpu_sensors(snapshot)
        .filter(temperature)
        .find(|s| s.name.contains("Package") || s.name.contains("Tdie"))
        .or_else(|| {
            cpu_sensors(snapshot)
                .filter(temperature)
                .find(|s| s.name.contains("Core"))
        })
        .map(|s| s.value)
        .unwrap_or(0.0)
}

fn gpu_temperature(snapshot: &HardwareSnapshot) -> f64 {
    snapshot
        .units
        .iter()
        .filter(|u| u.kind.is_gpu())
        .flat_map(|u| u.sensors.iter())
        .find(|s| s.kind == SensorKind::Temperature && s.name.contains("Core"))
        .map(|s| s.value)
        .unwrap_or(0.0)
}

fn total_memory_description(snapshot: &HardwareSnapshot) -> String {
    // Used + Available is summed because the subsystem does not always
    // expose a direct total sensor.
    for unit in snapshot.units.iter().filter(|u| u.kind == UnitKind::Memory) {
        let data = |needle: &str| {
            unit.sensors
                .iter()
                .find(|s| s.kind == SensorKind::Data && s.name.contains(needle))
                .map(|s| s.value)
        };

        if let (Some(used), Some(available)) = (data("Used"), data("Available")) {
            return format!("{} GB", format_one_decimal(used + available));
        }
    }

    "0 GB".to_string()
}

/// Round-half-away-from-zero to one decimal place.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One decimal place with a trailing `.0` dropped: 16.0 -> "16",
/// 15.7 -> "15.7".
pub(crate) fn format_one_decimal(value: f64) -> String {
    let rounded = round_one_decimal(value);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::HardwareUnit;

    fn sensor(kind: SensorKind, name: &str, value: f64) -> SensorReading {
        SensorReading {
            kind,
            name: name.to_string(),
            value,
        }
    }

    fn snapshot(units: Vec<HardwareUnit>) -> HardwareSnapshot {
        HardwareSnapshot {
            host_name: Some("testhost".to_string()),
            units,
        }
    }

    #[test]
    fn missing_cpu_unit_defaults_to_zero() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Memory,
            sensors: vec![],
        }]);
        let readings = select_readings(&snap);
        assert_eq!(readings.cpu_usage_percent, 0.0);
        assert_eq!(readings.cpu_temperature_c, 0.0);
    }

    #[test]
    fn package_temperature_beats_core() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Cpu,
            sensors: vec![
                sensor(SensorKind::Temperature, "Core 0", 58.0),
                sensor(SensorKind::Temperature, "Package id 0", 63.0),
            ],
        }]);
        assert_eq!(select_readings(&snap).cpu_temperature_c, 63.0);
    }

    #[test]
    fn tdie_counts_as_package_tier() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Cpu,
            sensors: vec![
                sensor(SensorKind::Temperature, "Core 0", 58.0),
                sensor(SensorKind::Temperature, "Tdie", 61.0),
            ],
        }]);
        assert_eq!(select_readings(&snap).cpu_temperature_c, 61.0);
    }

    #[test]
    fn core_temperature_is_the_fallback() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Cpu,
            sensors: vec![sensor(SensorKind::Temperature, "Core 1", 57.4)],
        }]);
        assert_eq!(select_readings(&snap).cpu_temperature_c, 57.0);
    }

    #[test]
    fn cpu_load_requires_a_total_sensor() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Cpu,
            sensors: vec![
                sensor(SensorKind::Load, "CPU Core #1", 93.0),
                sensor(SensorKind::Load, "CPU Total", 42.34),
            ],
        }]);
        assert_eq!(select_readings(&snap).cpu_usage_percent, 42.3);
    }

    #[test]
    fn gpu_temperature_needs_a_core_sensor() {
        let snap = snapshot(vec![
            HardwareUnit {
                kind: UnitKind::GpuAmd,
                sensors: vec![sensor(SensorKind::Temperature, "GPU Hot Spot", 90.0)],
            },
            HardwareUnit {
                kind: UnitKind::GpuNvidia,
                sensors: vec![sensor(SensorKind::Temperature, "GPU Core", 70.2)],
            },
        ]);
        assert_eq!(select_readings(&snap).gpu_temperature_c, 70.0);
    }

    #[test]
    fn no_gpu_unit_defaults_to_zero() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Cpu,
            sensors: vec![],
        }]);
        assert_eq!(select_readings(&snap).gpu_temperature_c, 0.0);
    }

    #[test]
    fn memory_total_is_used_plus_available() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Memory,
            sensors: vec![
                sensor(SensorKind::Data, "Memory Used", 10.0),
                sensor(SensorKind::Data, "Memory Available", 6.0),
            ],
        }]);
        assert_eq!(select_readings(&snap).total_memory_description, "16 GB");
    }

    #[test]
    fn memory_with_one_sensor_missing_keeps_default() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Memory,
            sensors: vec![sensor(SensorKind::Data, "Memory Used", 10.0)],
        }]);
        assert_eq!(select_readings(&snap).total_memory_description, "0 GB");
    }

    #[test]
    fn fractional_memory_keeps_one_decimal() {
        let snap = snapshot(vec![HardwareUnit {
            kind: UnitKind::Memory,
            sensors: vec![
                sensor(SensorKind::Data, "Memory Used", 9.43),
                sensor(SensorKind::Data, "Memory Available", 6.24),
            ],
        }]);
        assert_eq!(select_readings(&snap).total_memory_description, "15.7 GB");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_one_decimal(42.34), 42.3);
        assert_eq!(round_one_decimal(42.35), 42.4);
        assert_eq!(format_one_decimal(16.0), "16");
        assert_eq!(format_one_decimal(16.04), "16");
        assert_eq!(format_one_decimal(2.5), "2.5");
    }
}
