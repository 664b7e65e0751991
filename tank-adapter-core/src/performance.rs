use serde::{Serialize, ser::SerializeStruct};
use std::time::Duration;
use sysinfo::{System, get_current_pid};

/// Elapsed time and memory usage of one operation.
///
/// Created once the timing of the operation ends and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqlPerformance {
    runtime: f64,
    memory: u64,
}

impl SqlPerformance {
    /// Snapshot for an operation that took `elapsed`, memory is sampled now.
    pub fn new(elapsed: Duration) -> Self {
        Self::from_seconds(elapsed.as_secs_f64())
    }

    /// Snapshot from a raw delta in seconds (`-start + end`), negative deltas count as zero.
    pub fn from_seconds(runtime: f64) -> Self {
        Self::with_memory(runtime, current_memory())
    }

    /// Fixed snapshot, no sampling.
    pub fn with_memory(runtime: f64, memory: u64) -> Self {
        Self {
            runtime: if runtime.is_finite() {
                runtime.max(0.0)
            } else {
                0.0
            },
            memory,
        }
    }

    /// Elapsed time in seconds.
    pub fn runtime(&self) -> f64 {
        self.runtime
    }

    /// Resident memory of the process in bytes, at construction.
    pub fn memory(&self) -> u64 {
        self.memory
    }

    /// Elapsed time rendered for humans.
    ///
    /// - below 1 millisecond: whole microseconds, `"250 µs"`
    /// - below 1 second: milliseconds with two decimals, `"500.00 ms"`
    /// - below 1 minute: seconds with two decimals, `"2.50 s"`
    /// - otherwise: whole minutes and the remaining seconds, `"1 min 5.00 s"`
    pub fn pretty_runtime(&self) -> String {
        let seconds = self.runtime;
        let micros = (seconds * 1_000_000.0).round();
        if micros < 1_000.0 {
            return format!("{:.0} µs", micros);
        }
        let millis = (seconds * 100_000.0).round() / 100.0;
        if millis < 1_000.0 {
            return format!("{:.2} ms", millis);
        }
        // Whole hundredths: the remainder stays below `60.00`
        let seconds = (seconds * 100.0).round() / 100.0;
        if seconds < 60.0 {
            return format!("{:.2} s", seconds);
        }
        let minutes = (seconds / 60.0).floor();
        format!("{} min {:.2} s", minutes as u64, seconds - minutes * 60.0)
    }
}

impl Serialize for SqlPerformance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SqlPerformance", 3)?;
        state.serialize_field("run_time", &self.runtime)?;
        state.serialize_field("prettyRunTime", &self.pretty_runtime())?;
        state.serialize_field("memory", &self.memory)?;
        state.end()
    }
}

/// Resident memory of the current process, zero when the platform does not report it.
pub fn current_memory() -> u64 {
    let Ok(pid) = get_current_pid() else {
        log::debug!("Could not resolve the current process id");
        return 0;
    };
    let mut system = System::new();
    if !system.refresh_process(pid) {
        log::debug!("Could not refresh the process {pid}");
        return 0;
    }
    system.process(pid).map(|p| p.memory()).unwrap_or_default()
}

/// Info level log line written after each successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord<'a> {
    /// The statement with its parameters inlined, display only.
    pub sql: String,
    pub performance: &'a SqlPerformance,
}

impl<'a> PerformanceRecord<'a> {
    pub fn new(sql: String, performance: &'a SqlPerformance) -> Self {
        Self { sql, performance }
    }

    /// JSON object with the keys `sql`, `run_time`, `prettyRunTime` and `memory`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for PerformanceRecord<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PerformanceRecord", 4)?;
        state.serialize_field("sql", &self.sql)?;
        state.serialize_field("run_time", &self.performance.runtime)?;
        state.serialize_field("prettyRunTime", &self.performance.pretty_runtime())?;
        state.serialize_field("memory", &self.performance.memory)?;
        state.end()
    }
}
