// Timing and peak-memory measurement around a pipeline run.
use crate::util::{format_int, format_number};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchmarkResult {
    pub started_at: Option<DateTime<Utc>>,
    pub processing_time_sec: f64,
    /// Process high-water mark; `None` where the platform does not expose it.
    pub peak_memory_mb: Option<f64>,
    pub input_file_size_mb: f64,
    pub rows_processed: usize,
    pub unique_campaigns: usize,
}

impl BenchmarkResult {
    /// Rows processed per second.
    pub fn throughput(&self) -> f64 {
        if self.processing_time_sec > 0.0 {
            self.rows_processed as f64 / self.processing_time_sec
        } else {
            0.0
        }
    }

    pub fn display(&self) -> String {
        let separator = "=".repeat(60);
        let peak = match self.peak_memory_mb {
            Some(mb) => format!("{} MB", format_number(mb, 1)),
            None => "n/a".to_string(),
        };
        format!(
            "\n{sep}\n  BENCHMARK RESULTS\n{sep}\n\
             \x20 Input file size  : {size} MB\n\
             \x20 Rows processed   : {rows}\n\
             \x20 Unique campaigns : {campaigns}\n\
             \x20 Processing time  : {time} seconds\n\
             \x20 Peak memory      : {peak}\n\
             \x20 Throughput       : {throughput} rows/sec\n\
             {sep}\n",
            sep = separator,
            size = format_number(self.input_file_size_mb, 1),
            rows = format_int(self.rows_processed),
            campaigns = format_int(self.unique_campaigns),
            time = format_number(self.processing_time_sec, 2),
            peak = peak,
            throughput = format_number(self.throughput(), 0),
        )
    }
}

#[derive(Debug, Default)]
pub struct Benchmarker {
    result: BenchmarkResult,
}

impl Benchmarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> &BenchmarkResult {
        &self.result
    }

    /// Start measuring. Elapsed time and peak memory are recorded when the
    /// returned guard is dropped, whether the run succeeded or not.
    pub fn scope(&mut self) -> BenchmarkScope<'_> {
        self.result.started_at = Some(Utc::now());
        BenchmarkScope {
            bench: self,
            started: Instant::now(),
        }
    }
}

pub struct BenchmarkScope<'a> {
    bench: &'a mut Benchmarker,
    started: Instant,
}

impl BenchmarkScope<'_> {
    pub fn set_metadata(
        &mut self,
        input_file_size_mb: f64,
        rows_processed: usize,
        unique_campaigns: usize,
    ) {
        let result = &mut self.bench.result;
        result.input_file_size_mb = input_file_size_mb;
        result.rows_processed = rows_processed;
        result.unique_campaigns = unique_campaigns;
    }
}

impl Drop for BenchmarkScope<'_> {
    fn drop(&mut self) {
        let result = &mut self.bench.result;
        result.processing_time_sec = self.started.elapsed().as_secs_f64();
        result.peak_memory_mb = peak_memory_mb();
    }
}

#[cfg(target_os = "linux")]
fn peak_memory_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_hwm_kb(&status).map(|kb| kb as f64 / 1024.0)
}

#[cfg(not(target_os = "linux"))]
fn peak_memory_mb() -> Option<f64> {
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_hwm_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmHWM:"))
        .and_then(|rest| rest.trim().trim_end_matches("kB").trim().parse().ok())
}
