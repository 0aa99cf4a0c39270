pub mod network;
pub mod system;

/// Type tag of a hardware unit. GPU subtypes are kept separate because
/// real machines can carry more than one vendor's adapter at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Cpu,
    Memory,
    GpuNvidia,
    GpuAmd,
    GpuIntel,
}

impl UnitKind {
    pub fn is_gpu(self) -> bool {
        matches!(self, Self::GpuNvidia | Self::GpuAmd | Self::GpuIntel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Load,
    Temperature,
    Data,
}

#[derive(Debug, Clone)]
pub struct SensorReading {
    pub kind: SensorKind,
    pub name: String,
    pub value: f64,
}

/// One hardware unit with its named, refreshed sensor readings. Valid
/// only for the cycle in which it was collected.
#[derive(Debug, Clone)]
pub struct HardwareUnit {
    pub kind: UnitKind,
    pub sensors: Vec<SensorReading>,
}

#[derive(Debug, Clone, Default)]
pub struct HardwareSnapshot {
    pub host_name: Option<String>,
    pub units: Vec<HardwareUnit>,
}

#[derive(Debug, Clone)]
pub struct NicLink {
    pub name: String,
    pub is_up: bool,
    pub is_loopback: bool,
    pub speed_bits_per_sec: u64,
}
