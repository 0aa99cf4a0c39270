use crate::collectors::NicLink;
use crate::readings::format_one_decimal;
#[cfg(target_os = "linux")]
use std::fs;

/// Enumerates network interfaces in platform order.
pub fn collect_nics() -> Vec<NicLink> {
    collect_linux_nics()
}

#[cfg(target_os = "linux")]
fn collect_linux_nics() -> Vec<NicLink> {
    let Ok(entries) = fs::read_dir("/sys/class/net") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|v| v.to_str()) else {
            continue;
        };

        let is_up = fs::read_to_string(path.join("operstate"))
            .map(|s| s.trim() == "up")
            .unwrap_or(false);

        // ARPHRD_LOOPBACK in the sysfs type file.
        let is_loopback = fs::read_to_string(path.join("type"))
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|t| t == 772)
            .unwrap_or(name == "lo");

        // sysfs reports megabits/s; -1 means the driver does not know.
        let speed_mbit = fs::read_to_string(path.join("speed"))
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);
        let speed_bits_per_sec = if speed_mbit > 0 {
            speed_mbit as u64 * 1_000_000
        } else {
            0
        };

        out.push(NicLink {
            name: name.to_string(),
            is_up,
            is_loopback,
            speed_bits_per_sec,
        });
    }

    out
}

#[cfg(not(target_os = "linux"))]
fn collect_linux_nics() -> Vec<NicLink> {
    Vec::new()
}

/// First interface that is up, not loopback, and reports a positive
/// speed wins; everything after it is ignored.
pub fn describe_link_speed(nics: &[NicLink]) -> String {
    for nic in nics {
        if !nic.is_up || nic.is_loopback || nic.speed_bits_per_sec == 0 {
            continue;
        }

        let mbps = nic.speed_bits_per_sec as f64 / 1_000_000.0;
        return if mbps >= 1000.0 {
            format!("{} Gbps", format_one_decimal(mbps / 1000.0))
        } else {
            format!("{mbps:.0} Mbps")
        };
    }

    "Disconnected".to_string()
}
