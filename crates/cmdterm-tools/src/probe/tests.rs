use super::*;

#[tokio::test]
async fn test_unavailable_probe_fails_every_measurement() {
    let probe = UnavailableProbe::new("no host access");

    assert!(matches!(
        probe.cpu_percent(Duration::from_millis(1)).await,
        Err(Error::Unavailable(reason)) if reason == "no host access"
    ));
    assert!(probe.memory().await.is_err());
    assert!(probe.disk(Path::new("/")).await.is_err());
    assert!(probe.processes(Duration::from_millis(1)).await.is_err());
}

#[test]
fn test_unavailable_probe_host_override() {
    let host = HostInfo {
        platform: "Linux".to_string(),
        platform_version: "Serverless".to_string(),
        architecture: "x64".to_string(),
        processor: "Serverless Function".to_string(),
    };
    let probe = UnavailableProbe::new("restricted").with_host(host.clone());

    assert_eq!(probe.host_info(), host);
}

#[test]
fn test_host_info_from_build_target() {
    let host = HostInfo::from_build_target();
    assert_eq!(host.architecture, std::env::consts::ARCH);
    assert!(!host.platform.is_empty());
}

#[test]
fn test_sysinfo_host_info_fields_present() {
    let host = SysinfoProbe::new().host_info();
    assert!(!host.platform.is_empty());
    assert!(!host.architecture.is_empty());
    assert!(!host.processor.is_empty());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_sysinfo_memory_and_root_disk() {
    let probe = SysinfoProbe::new();

    let memory = probe.memory().await.unwrap();
    assert!(memory.total_bytes > 0);
    assert!(memory.available_bytes <= memory.total_bytes);

    // container filesystems may not expose a volume for "/"
    if let Ok(disk) = probe.disk(Path::new("/")).await {
        assert_eq!(disk.used_bytes + disk.free_bytes, disk.total_bytes);
    }
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_sysinfo_processes_include_self() {
    let probe = SysinfoProbe::new();
    let processes = probe.processes(Duration::from_millis(50)).await.unwrap();

    let me = std::process::id();
    assert!(processes.iter().any(|p| p.pid == me));
}
