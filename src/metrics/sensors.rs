use sysinfo::Components;

use super::types::round1;

/// An optional metric provider. Providers are detected once at startup and
/// either yield a reading or abstain on a given tick; abstaining never fails
/// the surrounding collection.
pub trait Sensor {
    type Reading;

    fn name(&self) -> &'static str;

    fn sample(&mut self) -> Option<Self::Reading>;
}

const CPU_COMPONENT_HINTS: &[&str] = &[
    "coretemp",
    "k10temp",
    "cpu thermal",
    "cpu_thermal",
    "cpu-thermal",
    "acpitz",
    "tdie",
];

/// Package temperature averaged from whatever thermal components the host
/// exposes, preferring the well-known CPU component names.
pub struct CpuTempSensor;

impl CpuTempSensor {
    pub fn detect() -> Option<Self> {
        let components = Components::new_with_refreshed_list();
        if components.list().is_empty() {
            return None;
        }
        Some(CpuTempSensor)
    }
}

impl Sensor for CpuTempSensor {
    type Reading = f64;

    fn name(&self) -> &'static str {
        "cpu-temp"
    }

    fn sample(&mut self) -> Option<f64> {
        let components = Components::new_with_refreshed_list();
        let readings: Vec<(String, f32)> = components
            .iter()
            .map(|c| (c.label().to_string(), c.temperature()))
            .collect();
        average_cpu_temp(&readings)
    }
}

fn average_cpu_temp(readings: &[(String, f32)]) -> Option<f64> {
    let matched: Vec<f64> = readings
        .iter()
        .filter(|(label, temp)| {
            let label = label.to_lowercase();
            *temp > 0.0 && CPU_COMPONENT_HINTS.iter().any(|hint| label.contains(hint))
        })
        .map(|(_, temp)| *temp as f64)
        .collect();
    if !matched.is_empty() {
        return Some(round1(matched.iter().sum::<f64>() / matched.len() as f64));
    }

    let positive: Vec<f64> = readings
        .iter()
        .filter(|(_, temp)| *temp > 0.0)
        .map(|(_, temp)| *temp as f64)
        .collect();
    if positive.is_empty() {
        return None;
    }
    Some(round1(positive.iter().sum::<f64>() / positive.len() as f64))
}
