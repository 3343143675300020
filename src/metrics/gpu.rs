use std::process::Command;

use super::sensors::Sensor;
use super::types::{round1, GpuReading};

const SMI_QUERY: &str =
    "--query-gpu=index,name,utilization.gpu,utilization.memory,memory.used,memory.total,temperature.gpu";

/// NVIDIA GPU readings via `nvidia-smi`. Detected once at startup; hosts
/// without the tool (or without a working driver) simply have no GPU
/// provider registered.
pub struct GpuSensor;

impl GpuSensor {
    pub fn detect() -> Option<Self> {
        let output = Command::new("nvidia-smi").arg("-L").output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(GpuSensor)
    }
}

impl Sensor for GpuSensor {
    type Reading = Vec<GpuReading>;

    fn name(&self) -> &'static str {
        "gpu"
    }

    fn sample(&mut self) -> Option<Vec<GpuReading>> {
        let output = Command::new("nvidia-smi")
            .args([SMI_QUERY, "--format=csv,noheader,nounits"])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let readings = parse_smi_csv(&String::from_utf8_lossy(&output.stdout));
        if readings.is_empty() {
            return None;
        }
        Some(readings)
    }
}

/// Parses `nvidia-smi --format=csv,noheader,nounits` rows. Rows that do not
/// match the queried column layout are skipped rather than failing the
/// sample.
fn parse_smi_csv(text: &str) -> Vec<GpuReading> {
    text.lines().filter_map(parse_smi_row).collect()
}

fn parse_smi_row(line: &str) -> Option<GpuReading> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 7 {
        return None;
    }
    Some(GpuReading {
        index: fields[0].parse().ok()?,
        name: fields[1].to_string(),
        vendor: "nvidia".to_string(),
        gpu_percent: fields[2].parse().ok()?,
        mem_percent: fields[3].parse().ok()?,
        mem_used_mb: round1(fields[4].parse().ok()?),
        mem_total_mb: round1(fields[5].parse().ok()?),
        temp_c: fields[6].parse().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_gpus() {
        let text = "0, NVIDIA GeForce RTX 3080, 41, 55, 5632, 10240, 61\n\
                    1, NVIDIA T400, 2, 1, 128, 2048, 38\n";
        let readings = parse_smi_csv(text);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].index, 0);
        assert_eq!(readings[0].name, "NVIDIA GeForce RTX 3080");
        assert_eq!(readings[0].vendor, "nvidia");
        assert_eq!(readings[0].gpu_percent, 41.0);
        assert_eq!(readings[0].mem_used_mb, 5632.0);
        assert_eq!(readings[1].temp_c, Some(38.0));
    }

    #[test]
    fn missing_temperature_becomes_none() {
        let readings = parse_smi_csv("0, NVIDIA T400, 2, 1, 128, 2048, [N/A]\n");
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].temp_c, None);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let text = "garbage\n\
                    0, NVIDIA T400, 2, 1\n\
                    0, NVIDIA T400, 2, 1, 128, 2048, 38\n";
        assert_eq!(parse_smi_csv(text).len(), 1);
        assert!(parse_smi_csv("").is_empty());
    }
}
