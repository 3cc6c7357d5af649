//! Background memory-pressure monitor.
//!
//! On macOS a tokio task samples `vm_stat` at a fixed interval and runs the
//! system purge utility when free memory is low while a lot of memory is
//! merely inactive. It shares nothing with the reconciliation and its
//! failures are only logged.

use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const MIB: u64 = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub interval: Duration,
    pub page_size: u64,
    /// Reclaim only when free memory drops below this.
    pub free_threshold: u64,
    /// ...and inactive memory exceeds this.
    pub inactive_threshold: u64,
    pub sample_command: String,
    pub reclaim_command: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(target_os = "macos"),
            interval: Duration::from_secs(10),
            page_size: 4096,
            free_threshold: 512 * MIB,
            inactive_threshold: 1024 * MIB,
            sample_command: "vm_stat".into(),
            reclaim_command: "/usr/bin/purge".into(),
        }
    }
}

/// Page counts from one `vm_stat` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemorySample {
    pub free_pages: u64,
    pub speculative_pages: u64,
    pub inactive_pages: u64,
}

impl MemorySample {
    /// Free plus speculative memory, in bytes.
    pub fn free_bytes(&self, page_size: u64) -> u64 {
        (self.free_pages + self.speculative_pages) * page_size
    }

    pub fn inactive_bytes(&self, page_size: u64) -> u64 {
        self.inactive_pages * page_size
    }

    pub fn needs_reclaim(&self, config: &MonitorConfig) -> bool {
        self.free_bytes(config.page_size) < config.free_threshold
            && self.inactive_bytes(config.page_size) > config.inactive_threshold
    }
}

/// Parse `vm_stat` output. Returns `None` unless the free and inactive
/// counters are both present.
pub fn parse_vm_stat(text: &str) -> Option<MemorySample> {
    let mut free = None;
    let mut inactive = None;
    let mut speculative = 0;

    for line in text.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(pages) = value.trim().trim_end_matches('.').parse::<u64>() else {
            continue;
        };
        match name.trim() {
            "Pages free" => free = Some(pages),
            "Pages inactive" => inactive = Some(pages),
            "Pages speculative" => speculative = pages,
            _ => {}
        }
    }

    Some(MemorySample {
        free_pages: free?,
        speculative_pages: speculative,
        inactive_pages: inactive?,
    })
}

/// A running monitor. Dropping the handle leaves the task running until
/// the runtime shuts down; [`MonitorHandle::stop`] ends it early.
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the task to exit without waiting for it.
    pub fn stop(self) {
        if self.shutdown.send(true).is_err() {
            self.task.abort();
        }
    }
}

/// Start the monitor on `runtime`.
pub fn spawn(config: MonitorConfig, runtime: &Handle) -> MonitorHandle {
    let (shutdown, rx) = watch::channel(false);
    let task = runtime.spawn(monitor_loop(config, rx));
    MonitorHandle { shutdown, task }
}

async fn monitor_loop(config: MonitorConfig, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(config.interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => check_memory(&config).await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    debug!("memory monitor stopped");
}

async fn check_memory(config: &MonitorConfig) {
    let output = match Command::new(&config.sample_command).output().await {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            debug!(status = %output.status, "memory sampling failed");
            return;
        }
        Err(e) => {
            debug!(error = %e, "memory sampling failed");
            return;
        }
    };

    let Some(sample) = parse_vm_stat(&String::from_utf8_lossy(&output.stdout)) else {
        debug!("unrecognised vm_stat output");
        return;
    };
    if !sample.needs_reclaim(config) {
        return;
    }

    warn!(
        free_mib = sample.free_bytes(config.page_size) / MIB,
        inactive_mib = sample.inactive_bytes(config.page_size) / MIB,
        "memory pressure; purging inactive memory"
    );
    if let Err(e) = Command::new(&config.reclaim_command).status().await {
        warn!(command = %config.reclaim_command, error = %e, "reclaim failed");
    }
}
