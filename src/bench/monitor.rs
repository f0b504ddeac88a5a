//! Host resource sampling during benchmark phases.
//!
//! A background thread polls the current process's resident memory and CPU
//! usage on a fixed cadence. It shares no state with the engine or storage;
//! samples go into an append-only vector consumed after the phase ends.

use log::warn;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use sysinfo::{ProcessExt, System, SystemExt};

/// One poll of the host process.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSample {
    /// Resident set size in bytes.
    pub memory_bytes: u64,
    /// Process CPU usage in percent since the previous refresh.
    pub cpu_percent: f32,
}

/// Reduction of all samples taken during one phase.
#[derive(Debug, Clone, Default)]
pub struct ResourceSummary {
    /// Highest resident memory observed, in MiB.
    pub peak_memory_mb: f64,
    /// Mean CPU usage across samples, in percent.
    pub avg_cpu_percent: f64,
    /// Number of samples the summary was computed from.
    pub sample_count: usize,
}

impl ResourceSummary {
    fn from_samples(samples: &[ResourceSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let peak_bytes = samples.iter().map(|s| s.memory_bytes).max().unwrap_or(0);
        let cpu_sum: f64 = samples.iter().map(|s| f64::from(s.cpu_percent)).sum();

        Self {
            peak_memory_mb: peak_bytes as f64 / (1024.0 * 1024.0),
            avg_cpu_percent: cpu_sum / samples.len() as f64,
            sample_count: samples.len(),
        }
    }
}

/// Polls the current process on a fixed interval until stopped.
pub struct ResourceMonitor {
    stop: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<ResourceSample>>>,
    handle: JoinHandle<()>,
}

impl ResourceMonitor {
    /// Spawn the sampling thread.
    pub fn start(interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let samples = Arc::new(Mutex::new(Vec::new()));

        let thread_stop = Arc::clone(&stop);
        let thread_samples = Arc::clone(&samples);

        let handle = std::thread::spawn(move || {
            let pid = match sysinfo::get_current_pid() {
                Ok(pid) => pid,
                Err(e) => {
                    warn!("resource monitor disabled, cannot resolve own pid: {e}");
                    return;
                }
            };

            let mut sys = System::new();
            while !thread_stop.load(Ordering::Relaxed) {
                sys.refresh_process(pid);
                if let Some(process) = sys.process(pid) {
                    thread_samples.lock().push(ResourceSample {
                        memory_bytes: process.memory(),
                        cpu_percent: process.cpu_usage(),
                    });
                }
                std::thread::sleep(interval);
            }
        });

        Self {
            stop,
            samples,
            handle,
        }
    }

    /// Stop sampling, join the thread, and reduce the samples.
    pub fn stop(self) -> ResourceSummary {
        self.stop.store(true, Ordering::Relaxed);
        if self.handle.join().is_err() {
            warn!("resource monitor thread panicked");
        }

        let samples = self.samples.lock();
        ResourceSummary::from_samples(&samples)
    }
}
