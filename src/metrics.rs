//! Poll counters for the dashboard's own health view, simplified to what a
//! client-side sync layer needs: totals, failures by error type, uptime.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Typename {
    fn typename(&self) -> &'static str;
}

pub struct Metrics {
    polls: AtomicU64,
    failures: AtomicU64,
    // failure counters by error type name (dynamic)
    errors: Mutex<HashMap<&'static str, u64>>,
    start_time: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            polls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            errors: Mutex::new(HashMap::new()),
            start_time: unix_secs_now(),
        }
    }

    pub fn add_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_failure<E: Typename>(&self, error: &E) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        let mut errors = self.errors.lock().expect("metrics lock");
        *errors.entry(error.typename()).or_insert(0) += 1;
    }

    /// Records one completed fetch outcome.
    pub fn record<T, E: Typename>(&self, result: &Result<T, E>) {
        self.add_poll();
        if let Err(e) = result {
            self.add_failure(e);
        }
    }

    pub fn get_uptime(&self) -> u64 {
        unix_secs_now().saturating_sub(self.start_time)
    }

    /// JSON-formatted metrics snapshot.
    pub fn get_json(&self) -> Value {
        let errors: HashMap<String, u64> = self
            .errors
            .lock()
            .expect("metrics lock")
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect();

        serde_json::json!({
            "polls": self.polls.load(Ordering::Relaxed),
            "failures": self.failures.load(Ordering::Relaxed),
            "errors": errors,
            "uptime": self.get_uptime(),
        })
    }
}

fn unix_secs_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
