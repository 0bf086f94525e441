//! Framework-independent "Get Weather" action.
//!
//! A GUI button handler, a CLI command and a test all drive the same
//! [`ForecastController::execute`].

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::{
    City, ErrorKind, ForecastError, ForecastSource,
    summary::{render, summarize},
};

/// Where the city name comes from; read once per trigger.
pub trait CityInput {
    fn city(&self) -> String;
}

/// Where the result goes; each call replaces everything shown before.
pub trait ForecastDisplay {
    fn show(&self, text: &str);
}

impl CityInput for String {
    fn city(&self) -> String {
        self.clone()
    }
}

impl CityInput for &str {
    fn city(&self) -> String {
        (*self).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A forecast with this many days was shown.
    Displayed { days: usize },
    /// An error message was shown.
    Failed(ErrorKind),
    /// A previous request was still running; nothing was done.
    Ignored,
}

#[derive(Debug)]
pub struct ForecastController<S, I, D> {
    source: S,
    input: I,
    display: D,
    busy: AtomicBool,
}

impl<S, I, D> ForecastController<S, I, D>
where
    S: ForecastSource,
    I: CityInput,
    D: ForecastDisplay,
{
    pub fn new(source: S, input: I, display: D) -> Self {
        Self { source, input, display, busy: AtomicBool::new(false) }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Fetch, summarize and show the forecast for the current input.
    ///
    /// Triggers that arrive while a request is in flight are ignored.
    pub async fn execute(&self) -> Outcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("request already in flight, ignoring trigger");
            return Outcome::Ignored;
        };

        match self.run().await {
            Ok((text, days)) => {
                info!(days, "forecast displayed");
                self.display.show(&text);
                Outcome::Displayed { days }
            }
            Err(err) => {
                info!(kind = %err.kind(), error = %err, "forecast failed");
                self.display.show(&err.to_display_text());
                Outcome::Failed(err.kind())
            }
        }
    }

    async fn run(&self) -> Result<(String, usize), ForecastError> {
        let city = City::parse(&self.input.city())?;
        let raw = self.source.fetch_forecast(&city).await?;
        debug!(%city, location = ?raw.location_name(), "forecast received");
        let lines = summarize(&raw)?;
        Ok((render(&lines), lines.len()))
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
