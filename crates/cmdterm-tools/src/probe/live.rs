use super::{DiskUsage, HostInfo, MemoryUsage, ProcessSample, SystemProbe};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::{Disks, System};
use tracing::debug;

/// Live statistics from the host through `sysinfo`.
///
/// `sysinfo` refreshes are blocking, so every measurement runs on the
/// blocking pool with a fresh `System`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProbe;

impl SysinfoProbe {
    /// Create a new live probe
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Unavailable(format!("probe task failed: {}", e)))?
}

#[async_trait::async_trait]
impl SystemProbe for SysinfoProbe {
    fn host_info(&self) -> HostInfo {
        let fallback = HostInfo::from_build_target();
        let mut sys = System::new();
        sys.refresh_cpu();
        let processor = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or(fallback.processor);

        HostInfo {
            platform: System::name().unwrap_or(fallback.platform),
            platform_version: System::os_version()
                .or_else(System::kernel_version)
                .unwrap_or(fallback.platform_version),
            architecture: System::cpu_arch().unwrap_or(fallback.architecture),
            processor,
        }
    }

    async fn cpu_percent(&self, window: Duration) -> Result<f32> {
        blocking(move || {
            let mut sys = System::new();
            sys.refresh_cpu();
            std::thread::sleep(window);
            sys.refresh_cpu();
            Ok(sys.global_cpu_info().cpu_usage())
        })
        .await
    }

    async fn memory(&self) -> Result<MemoryUsage> {
        blocking(|| {
            let mut sys = System::new();
            sys.refresh_memory();
            let total_bytes = sys.total_memory();
            if total_bytes == 0 {
                return Err(Error::Unavailable("memory totals not reported".to_string()));
            }
            Ok(MemoryUsage {
                total_bytes,
                available_bytes: sys.available_memory(),
                used_bytes: sys.used_memory(),
            })
        })
        .await
    }

    async fn disk(&self, path: &Path) -> Result<DiskUsage> {
        let path: PathBuf = path.to_path_buf();
        blocking(move || {
            let disks = Disks::new_with_refreshed_list();
            // the volume whose mount point is the longest prefix of `path`
            let disk = disks
                .list()
                .iter()
                .filter(|d| path.starts_with(d.mount_point()))
                .max_by_key(|d| d.mount_point().as_os_str().len())
                .ok_or_else(|| {
                    Error::Unavailable(format!("no mounted volume holds {}", path.display()))
                })?;

            let total_bytes = disk.total_space();
            let free_bytes = disk.available_space();
            debug!(mount = %disk.mount_point().display(), total_bytes, "Disk usage sampled");
            Ok(DiskUsage {
                total_bytes,
                used_bytes: total_bytes.saturating_sub(free_bytes),
                free_bytes,
            })
        })
        .await
    }

    async fn processes(&self, window: Duration) -> Result<Vec<ProcessSample>> {
        blocking(move || {
            let mut sys = System::new();
            sys.refresh_memory();
            sys.refresh_processes();
            std::thread::sleep(window);
            sys.refresh_processes();

            let total_memory = sys.total_memory();
            Ok(sys
                .processes()
                .iter()
                .map(|(pid, process)| ProcessSample {
                    pid: pid.as_u32(),
                    name: process.name().to_string(),
                    cpu_percent: Some(process.cpu_usage()),
                    memory_percent: (total_memory > 0)
                        .then(|| (process.memory() as f64 / total_memory as f64 * 100.0) as f32),
                })
                .collect())
        })
        .await
    }
}
