//! Probe capability - raw CPU, memory, disk and process statistics
//!
//! The probe returns raw byte counts and percentages; normalisation into a
//! report happens in the engine.

mod live;

#[cfg(test)]
mod tests;

pub use live::SysinfoProbe;

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Static description of the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    /// Operating system name ("Linux", "Darwin", "Windows", ...)
    pub platform: String,
    /// Operating system version string
    pub platform_version: String,
    /// CPU architecture ("x86_64", "aarch64", ...)
    pub architecture: String,
    /// Processor label
    pub processor: String,
}

impl HostInfo {
    /// Host info derived from compile-time constants only
    #[must_use]
    pub fn from_build_target() -> Self {
        let platform = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Darwin",
            "windows" => "Windows",
            other => other,
        };
        Self {
            platform: platform.to_string(),
            platform_version: "unknown".to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            processor: "Unknown".to_string(),
        }
    }
}

/// Virtual memory totals in bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryUsage {
    /// Total physical memory
    pub total_bytes: u64,
    /// Memory available for new allocations
    pub available_bytes: u64,
    /// Memory in use
    pub used_bytes: u64,
}

/// Usage of one mounted volume in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    /// Volume size
    pub total_bytes: u64,
    /// Bytes in use
    pub used_bytes: u64,
    /// Bytes free
    pub free_bytes: u64,
}

/// One live process record. Percentages may be missing for processes the
/// platform would not report on.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    /// Process id
    pub pid: u32,
    /// Executable name
    pub name: String,
    /// CPU usage over the sampling window
    pub cpu_percent: Option<f32>,
    /// Resident memory as a share of total memory
    pub memory_percent: Option<f32>,
}

/// Source of resource-usage statistics.
#[async_trait::async_trait]
pub trait SystemProbe: Send + Sync {
    /// Static host description, captured once per session
    fn host_info(&self) -> HostInfo;

    /// Whole-machine CPU usage measured over `window`
    async fn cpu_percent(&self, window: Duration) -> Result<f32>;

    /// Virtual memory totals
    async fn memory(&self) -> Result<MemoryUsage>;

    /// Usage of the volume holding `path`
    async fn disk(&self, path: &Path) -> Result<DiskUsage>;

    /// Live processes with CPU usage measured over `window`
    async fn processes(&self, window: Duration) -> Result<Vec<ProcessSample>>;
}

/// A probe for deployments without access to host statistics. Every
/// measurement fails with [`Error::Unavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableProbe {
    reason: String,
    host: HostInfo,
}

impl UnavailableProbe {
    /// Create a probe that always reports `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            host: HostInfo::from_build_target(),
        }
    }

    /// Replace the reported host description
    #[must_use]
    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    fn unavailable<T>(&self) -> Result<T> {
        Err(Error::Unavailable(self.reason.clone()))
    }
}

#[async_trait::async_trait]
impl SystemProbe for UnavailableProbe {
    fn host_info(&self) -> HostInfo {
        self.host.clone()
    }

    async fn cpu_percent(&self, _window: Duration) -> Result<f32> {
        self.unavailable()
    }

    async fn memory(&self) -> Result<MemoryUsage> {
        self.unavailable()
    }

    async fn disk(&self, _path: &Path) -> Result<DiskUsage> {
        self.unavailable()
    }

    async fn processes(&self, _window: Duration) -> Result<Vec<ProcessSample>> {
        self.unavailable()
    }
}
