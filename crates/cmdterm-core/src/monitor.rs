//! Monitoring Snapshot Assembler
//!
//! Normalises raw probe readings into a [`MonitoringSnapshot`]. Monitoring
//! is advisory: when any probe call fails the assembler returns a labelled
//! fallback snapshot instead of an error.

use crate::error::Error;
use crate::session::Session;
use cmdterm_tools::{DiskUsage, MemoryUsage, ProcessSample, SystemProbe};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Number of processes kept in a snapshot
pub const TOP_PROCESSES: usize = 5;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Memory section, sizes in GB
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemorySection {
    /// Total memory
    #[serde(rename = "total")]
    pub total_gb: f64,
    /// Available memory
    #[serde(rename = "available")]
    pub available_gb: f64,
    /// Memory in use
    #[serde(rename = "used")]
    pub used_gb: f64,
    /// Share of memory not available, in percent
    pub percent: f64,
}

/// Disk section for the root volume, sizes in GB
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskSection {
    /// Volume size
    #[serde(rename = "total")]
    pub total_gb: f64,
    /// Space in use
    #[serde(rename = "used")]
    pub used_gb: f64,
    /// Free space
    #[serde(rename = "free")]
    pub free_gb: f64,
    /// `used / total * 100`
    pub percent: f64,
}

/// One row of the top-process table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    /// Process id
    pub pid: u32,
    /// Executable name
    pub name: String,
    /// CPU usage, missing when the platform would not report it
    pub cpu_percent: Option<f64>,
    /// Memory share, missing when the platform would not report it
    pub memory_percent: Option<f64>,
}

/// Where the snapshot numbers came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SnapshotSource {
    /// Measured on this host
    Live,
    /// Placeholder because a data source failed
    Fallback {
        /// What failed
        reason: String,
    },
}

/// Point-in-time resource usage report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringSnapshot {
    /// Whole-machine CPU usage
    pub cpu_percent: f64,
    /// Memory totals
    pub memory: MemorySection,
    /// Root volume usage
    pub disk: DiskSection,
    /// Busiest processes by CPU, at most [`TOP_PROCESSES`]
    pub top_processes: Vec<ProcessEntry>,
    /// Live or fallback
    pub source: SnapshotSource,
}

impl MonitoringSnapshot {
    /// A zeroed snapshot labelled with `reason`
    #[must_use]
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            cpu_percent: 0.0,
            memory: MemorySection::default(),
            disk: DiskSection::default(),
            top_processes: Vec::new(),
            source: SnapshotSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// Whether this is a placeholder
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, SnapshotSource::Fallback { .. })
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn gb(bytes: u64) -> f64 {
    round_to(bytes as f64 / BYTES_PER_GB, 2)
}

fn memory_section(memory: &MemoryUsage) -> MemorySection {
    let percent = if memory.total_bytes == 0 {
        0.0
    } else {
        let unavailable = memory.total_bytes.saturating_sub(memory.available_bytes);
        round_to(unavailable as f64 / memory.total_bytes as f64 * 100.0, 1)
    };
    MemorySection {
        total_gb: gb(memory.total_bytes),
        available_gb: gb(memory.available_bytes),
        used_gb: gb(memory.used_bytes),
        percent,
    }
}

fn disk_section(disk: &DiskUsage) -> DiskSection {
    let percent = if disk.total_bytes == 0 {
        0.0
    } else {
        round_to(disk.used_bytes as f64 / disk.total_bytes as f64 * 100.0, 2)
    };
    DiskSection {
        total_gb: gb(disk.total_bytes),
        used_gb: gb(disk.used_bytes),
        free_gb: gb(disk.free_bytes),
        percent,
    }
}

/// Busiest `TOP_PROCESSES` by CPU, missing values counted as zero
fn top_processes(mut samples: Vec<ProcessSample>) -> Vec<ProcessEntry> {
    samples.sort_by(|a, b| {
        let a = a.cpu_percent.unwrap_or(0.0);
        let b = b.cpu_percent.unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
    samples
        .into_iter()
        .take(TOP_PROCESSES)
        .map(|p| ProcessEntry {
            pid: p.pid,
            name: p.name,
            cpu_percent: p.cpu_percent.map(|v| round_to(f64::from(v), 1)),
            memory_percent: p.memory_percent.map(|v| round_to(f64::from(v), 1)),
        })
        .collect()
}

/// Root of the volume that holds `dir`
fn volume_root(dir: &Path) -> PathBuf {
    dir.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Builds snapshots from a [`SystemProbe`]
pub struct MonitoringAssembler {
    probe: Arc<dyn SystemProbe>,
    sample_window: Duration,
}

impl MonitoringAssembler {
    /// Create an assembler sampling CPU over `sample_window`
    pub fn new(probe: Arc<dyn SystemProbe>, sample_window: Duration) -> Self {
        Self {
            probe,
            sample_window,
        }
    }

    /// The probe behind this assembler
    pub fn probe(&self) -> &Arc<dyn SystemProbe> {
        &self.probe
    }

    /// Take a snapshot; never fails
    pub async fn snapshot(&self, session: &Session) -> MonitoringSnapshot {
        let root = volume_root(session.current_dir());
        let window = self.sample_window;

        let readings = tokio::try_join!(
            self.probe.cpu_percent(window),
            self.probe.memory(),
            self.probe.disk(&root),
            self.probe.processes(window),
        );

        match readings {
            Ok((cpu, memory, disk, processes)) => {
                debug!(session_id = %session.id(), processes = processes.len(), "Monitoring snapshot taken");
                MonitoringSnapshot {
                    cpu_percent: round_to(f64::from(cpu), 1),
                    memory: memory_section(&memory),
                    disk: disk_section(&disk),
                    top_processes: top_processes(processes),
                    source: SnapshotSource::Live,
                }
            }
            Err(e) => {
                let err = Error::CollaboratorUnavailable(e.to_string());
                warn!(session_id = %session.id(), error = %err, "Monitoring unavailable, using fallback snapshot");
                MonitoringSnapshot::fallback(err.to_string())
            }
        }
    }
}
