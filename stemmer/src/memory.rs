//! Background resident-memory sampler used for diagnostics.
//!
//! The sampler thread shares nothing with the stemming run except its stop
//! flag, which the owning [`MemorySampler`] handle sets on [`MemorySampler::stop`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    pub at: Duration,
    pub resident_mb: Option<f64>,
}

pub struct MemorySampler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Vec<MemorySample>>>,
}

impl MemorySampler {
    pub fn spawn(interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("memory-sampler".into())
            .spawn(move || sample_until_stopped(&flag, interval))?;
        Ok(Self { stop, handle: Some(handle) })
    }

    /// Signal the sampler, wait for it and return what it recorded.
    pub fn stop(mut self) -> Vec<MemorySample> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Vec<MemorySample> {
        self.stop.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else { return Vec::new() };
        handle.thread().unpark();
        handle.join().unwrap_or_default()
    }
}

impl Drop for MemorySampler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn sample_until_stopped(stop: &AtomicBool, interval: Duration) -> Vec<MemorySample> {
    let started = Instant::now();
    let mut samples = Vec::new();
    while !stop.load(Ordering::Acquire) {
        let sample = MemorySample { at: started.elapsed(), resident_mb: resident_mb() };
        match sample.resident_mb {
            Some(mb) => tracing::info!(resident_mb = mb, elapsed_s = sample.at.as_secs_f64(), "memory usage"),
            None => tracing::debug!("resident memory not available on this platform"),
        }
        samples.push(sample);

        let deadline = Instant::now() + interval;
        // park_timeout can wake spuriously; keep waiting until the deadline or stop.
        while !stop.load(Ordering::Acquire) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::park_timeout(deadline - now);
        }
    }
    samples
}

/// Resident set size of this process in MiB.
#[cfg(target_os = "linux")]
pub fn resident_mb() -> Option<f64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    // Page size is 4 KiB on every platform we ship to.
    Some((pages * 4096) as f64 / (1024.0 * 1024.0))
}

#[cfg(not(target_os = "linux"))]
pub fn resident_mb() -> Option<f64> {
    None
}
