use std::cmp::Ordering;

use sysinfo::System;

use super::types::{round1, round2, ProcessSample};

pub const TOP_PROCESS_COUNT: usize = 10;

pub fn top_processes(system: &System, limit: usize) -> Vec<ProcessSample> {
    let total_memory = system.total_memory();
    let samples = system
        .processes()
        .iter()
        .map(|(pid, process)| {
            let mem_percent = if total_memory > 0 {
                process.memory() as f64 / total_memory as f64 * 100.0
            } else {
                0.0
            };
            ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                cpu_percent: round1(process.cpu_usage() as f64),
                mem_percent: round2(mem_percent),
                status: format!("{:?}", process.status()),
            }
        })
        .collect();
    rank_by_cpu(samples, limit)
}

fn rank_by_cpu(mut samples: Vec<ProcessSample>, limit: usize) -> Vec<ProcessSample> {
    samples.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(Ordering::Equal)
    });
    samples.truncate(limit);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, cpu: f64) -> ProcessSample {
        ProcessSample {
            pid,
            name: format!("proc-{pid}"),
            cpu_percent: cpu,
            mem_percent: 0.0,
            status: "Run".to_string(),
        }
    }

    #[test]
    fn ranks_by_cpu_descending_and_truncates() {
        let ranked = rank_by_cpu(
            vec![sample(1, 5.0), sample(2, 80.0), sample(3, 0.5), sample(4, 12.0)],
            3,
        );
        let pids: Vec<u32> = ranked.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 4, 1]);
    }

    #[test]
    fn fewer_processes_than_limit() {
        assert_eq!(rank_by_cpu(vec![sample(1, 1.0)], 10).len(), 1);
        assert!(rank_by_cpu(Vec::new(), 10).is_empty());
    }
}
