use sysinfo::Disks;

use super::types::{bytes_to_gb, round1, DiskPartition};

/// Mounted real filesystems, excluding the loop/overlay noise a desktop
/// Linux host accumulates.
pub fn collect_partitions() -> Vec<DiskPartition> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter_map(|disk| {
            let device = disk.name().to_string_lossy().to_string();
            let mountpoint = disk.mount_point().to_string_lossy().to_string();
            if !is_real_partition(&device, &mountpoint) {
                return None;
            }
            let total = disk.total_space();
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            let percent = if total > 0 {
                round1(used as f64 / total as f64 * 100.0)
            } else {
                0.0
            };
            Some(DiskPartition {
                device,
                mountpoint,
                fstype: disk.file_system().to_string_lossy().to_string(),
                total_gb: bytes_to_gb(total),
                used_gb: bytes_to_gb(used),
                free_gb: bytes_to_gb(free),
                percent,
            })
        })
        .collect()
}

fn is_real_partition(device: &str, mountpoint: &str) -> bool {
    const DEVICE_SKIP: &[&str] = &["/dev/loop", "tmpfs", "overlay"];
    const MOUNT_SKIP: &[&str] = &["/snap/", "/run/snap", "/sys/", "/proc/"];

    !DEVICE_SKIP.iter().any(|skip| device.contains(skip))
        && !MOUNT_SKIP.iter().any(|skip| mountpoint.contains(skip))
}
