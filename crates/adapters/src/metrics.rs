//! Live OS process metrics for `DescribeProcesses` (spec §4.6). Looked
//! up via the OS process table; a gone process yields `running: false`
//! rather than an error.

use serde::Serialize;
use sysinfo::{Pid, ProcessRefreshKind, System};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessMetrics {
    pub running: bool,
    pub rss_bytes: u64,
    pub cpu_percent: f32,
    pub created_at: Option<String>,
    pub child_executables: Vec<String>,
}

/// Look up live metrics for `pid`, returning a `running: false` metrics
/// record (never an error) when the process is gone.
pub fn lookup(pid: u32) -> ProcessMetrics {
    let mut system = System::new();
    let sys_pid = Pid::from_u32(pid);
    system.refresh_processes_specifics(
        sysinfo::ProcessesToUpdate::Some(&[sys_pid]),
        true,
        ProcessRefreshKind::everything(),
    );

    let Some(process) = system.process(sys_pid) else {
        return ProcessMetrics::default();
    };

    let child_executables = system
        .processes()
        .values()
        .filter(|p| p.parent() == Some(sys_pid))
        .filter_map(|p| p.exe().map(|e| e.display().to_string()))
        .collect();

    ProcessMetrics {
        running: true,
        rss_bytes: process.memory(),
        cpu_percent: process.cpu_usage(),
        created_at: Some(process.start_time().to_string()),
        child_executables,
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
