//! Wall-clock timing around analysis calls

use std::fmt;
use std::time::{Duration, Instant};

/// Elapsed time of one named operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    pub name: String,
    pub elapsed: Duration,
}

impl Timing {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Execution time of {}: {:.6} seconds",
            self.name,
            self.seconds()
        )
    }
}

/// Run `f`, hand its elapsed time to `report`, and return its result unchanged
pub fn timed<T>(name: &str, report: impl FnOnce(&Timing), f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    let timing = Timing {
        name: name.to_string(),
        elapsed: start.elapsed(),
    };

    tracing::debug!(operation = name, elapsed_secs = timing.seconds(), "timed call finished");
    report(&timing);
    result
}
