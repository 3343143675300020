use super::sensors::Sensor;
use super::types::{round2, DiskIoTotals};

const SECTOR_SIZE: u64 = 512;

/// Cumulative disk I/O from `/proc/diskstats`, physical devices only.
/// Linux-specific; other platforms get no disk-I/O provider.
pub struct DiskIoSensor;

impl DiskIoSensor {
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "linux") && std::fs::metadata("/proc/diskstats").is_ok() {
            Some(DiskIoSensor)
        } else {
            None
        }
    }
}

impl Sensor for DiskIoSensor {
    type Reading = DiskIoTotals;

    fn name(&self) -> &'static str {
        "disk-io"
    }

    fn sample(&mut self) -> Option<DiskIoTotals> {
        let text = std::fs::read_to_string("/proc/diskstats").ok()?;
        parse_diskstats(&text)
    }
}

/// Sums reads/writes over whole devices, skipping partitions and virtual
/// devices so the totals match what a per-disk tool would report.
fn parse_diskstats(text: &str) -> Option<DiskIoTotals> {
    let mut read_sectors: u64 = 0;
    let mut write_sectors: u64 = 0;
    let mut read_count: u64 = 0;
    let mut write_count: u64 = 0;
    let mut seen = false;

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }
        let name = fields[2];
        if is_virtual_device(name) || is_partition(name) {
            continue;
        }
        let reads: u64 = fields[3].parse().ok()?;
        let sectors_read: u64 = fields[5].parse().ok()?;
        let writes: u64 = fields[7].parse().ok()?;
        let sectors_written: u64 = fields[9].parse().ok()?;

        read_count += reads;
        read_sectors += sectors_read;
        write_count += writes;
        write_sectors += sectors_written;
        seen = true;
    }

    if !seen {
        return None;
    }
    Some(DiskIoTotals {
        read_mb: round2(read_sectors as f64 * SECTOR_SIZE as f64 / 1024.0 / 1024.0),
        write_mb: round2(write_sectors as f64 * SECTOR_SIZE as f64 / 1024.0 / 1024.0),
        read_count,
        write_count,
    })
}

fn is_virtual_device(name: &str) -> bool {
    name.starts_with("loop") || name.starts_with("ram") || name.starts_with("zram")
}

fn is_partition(name: &str) -> bool {
    let ends_with_digit = name.chars().last().is_some_and(|c| c.is_ascii_digit());
    if name.starts_with("nvme") || name.starts_with("mmcblk") {
        // nvme0n1 is a whole device; nvme0n1p1 is a partition of it.
        ends_with_digit && name.contains('p')
    } else {
        ends_with_digit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
   8       0 sda 1000 0 2048 500 2000 0 4096 800 0 0 0
   8       1 sda1 900 0 1800 450 1900 0 3900 760 0 0 0
 259       0 nvme0n1 3000 0 8192 100 4000 0 16384 200 0 0 0
 259       1 nvme0n1p1 2900 0 8000 90 3900 0 16000 190 0 0 0
   7       0 loop0 50 0 400 1 0 0 0 0 0 0 0
";

    #[test]
    fn sums_whole_devices_only() {
        let totals = parse_diskstats(SAMPLE).unwrap();
        // sda + nvme0n1; partitions and loop devices excluded.
        assert_eq!(totals.read_count, 4000);
        assert_eq!(totals.write_count, 6000);
        assert_eq!(totals.read_mb, round2((2048 + 8192) as f64 * 512.0 / 1048576.0));
        assert_eq!(totals.write_mb, round2((4096 + 16384) as f64 * 512.0 / 1048576.0));
    }

    #[test]
    fn empty_or_virtual_only_input_abstains() {
        assert_eq!(parse_diskstats(""), None);
        assert_eq!(
            parse_diskstats("   7       0 loop0 50 0 400 1 0 0 0 0 0 0 0\n"),
            None
        );
    }

    #[test]
    fn partition_names() {
        assert!(is_partition("sda1"));
        assert!(is_partition("vdb2"));
        assert!(!is_partition("sda"));
        assert!(is_partition("nvme0n1p1"));
        assert!(!is_partition("nvme0n1"));
        assert!(is_partition("mmcblk0p2"));
        assert!(!is_partition("mmcblk0"));
    }
}
