use tracing::warn;

use crate::{
    config::AveragePolicy,
    error::{AnalysisError, Field},
    model::{Price, TradingData},
    utils::RunningMean,
};

/// A stateful visitor over a stock's trading days.
///
/// [`Stock::analyse`](crate::model::Stock::analyse) calls `process` once per
/// day in storage order; `result` reads the statistic afterwards and may be
/// called any number of times. `reset` readies the instance for a fresh
/// traversal.
pub trait Analyser {
    type Output;

    fn process(&mut self, day: &TradingData) -> Result<(), AnalysisError>;

    fn reset(&mut self);

    fn result(&self) -> Result<Self::Output, AnalysisError>;
}

fn finite(day: &TradingData, field: Field, value: Price) -> Result<Price, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::InvalidData {
            field,
            date: day.date().to_owned(),
        })
    }
}

/// Highest high and lowest low over every day processed.
#[derive(Default, Debug, Clone)]
pub struct HighLow {
    highs: Vec<Price>,
    lows: Vec<Price>,
}

impl HighLow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Analyser for HighLow {
    /// `(highest, lowest)`.
    type Output = (Price, Price);

    fn process(&mut self, day: &TradingData) -> Result<(), AnalysisError> {
        let high = finite(day, Field::High, day.high())?;
        let low = finite(day, Field::Low, day.low())?;

        self.highs.push(high);
        self.lows.push(low);

        Ok(())
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
    }

    fn result(&self) -> Result<Self::Output, AnalysisError> {
        let high = self.highs.iter().copied().reduce(Price::max);
        let low = self.lows.iter().copied().reduce(Price::min);

        high.zip(low).ok_or(AnalysisError::NoData)
    }
}

/// Average close over the most recent `days` days processed.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    days: usize,
    policy: AveragePolicy,
    days_counted: usize,
    closes: Vec<Price>,
}

impl MovingAverage {
    pub fn new(days: usize) -> Self {
        Self {
            days,
            policy: AveragePolicy::default(),
            days_counted: 0,
            closes: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: AveragePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Days seen, including ones skipped for bad data.
    pub fn days_counted(&self) -> usize {
        self.days_counted
    }
}

impl Analyser for MovingAverage {
    type Output = Price;

    /// A non-finite close is reported and skipped rather than failing the
    /// traversal.
    fn process(&mut self, day: &TradingData) -> Result<(), AnalysisError> {
        self.days_counted += 1;

        match finite(day, Field::Close, day.close()) {
            Ok(close) => self.closes.push(close),
            Err(err) => warn!(%err, "moving average skipped a day"),
        }

        Ok(())
    }

    fn reset(&mut self) {
        self.days_counted = 0;
        self.closes.clear();
    }

    fn result(&self) -> Result<Self::Output, AnalysisError> {
        if self.days == 0 {
            return Err(AnalysisError::ZeroWindow);
        }

        let recent = self.closes.iter().rev().take(self.days);
        let used = recent.len();
        let total: Price = recent.sum();

        let divisor = match self.policy {
            AveragePolicy::ConfiguredWindow => self.days,
            AveragePolicy::AvailableDays if used == 0 => return Err(AnalysisError::NoData),
            AveragePolicy::AvailableDays => used,
        };

        Ok(total / divisor as Price)
    }
}

/// The most recent day that opened at least `delta` above the previous close.
#[derive(Debug, Clone)]
pub struct GapUp {
    delta: Price,
    previous_close: Option<Price>,
    gap_ups: Vec<TradingData>,
}

impl GapUp {
    pub fn new(delta: Price) -> Self {
        Self {
            delta,
            previous_close: None,
            gap_ups: Vec::new(),
        }
    }

    /// Every qualifying day so far, oldest first.
    pub fn candidates(&self) -> &[TradingData] {
        &self.gap_ups
    }
}

impl Analyser for GapUp {
    /// `None` when no day qualified.
    type Output = Option<TradingData>;

    fn process(&mut self, day: &TradingData) -> Result<(), AnalysisError> {
        let close = finite(day, Field::Close, day.close())?;

        if let Some(previous_close) = self.previous_close {
            let open = finite(day, Field::Open, day.open())?;

            if open - previous_close >= self.delta {
                self.gap_ups.push(day.clone());
            }
        }

        self.previous_close = Some(close);

        Ok(())
    }

    fn reset(&mut self) {
        self.previous_close = None;
        self.gap_ups.clear();
    }

    fn result(&self) -> Result<Self::Output, AnalysisError> {
        Ok(self.gap_ups.last().cloned())
    }
}

/// Mean traded volume over every day processed.
#[derive(Default, Debug, Clone)]
pub struct AverageVolume {
    volumes: RunningMean,
}

impl AverageVolume {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Analyser for AverageVolume {
    type Output = f64;

    fn process(&mut self, day: &TradingData) -> Result<(), AnalysisError> {
        self.volumes.feed(day.volume() as f64);

        Ok(())
    }

    fn reset(&mut self) {
        self.volumes.clear();
    }

    fn result(&self) -> Result<Self::Output, AnalysisError> {
        self.volumes.avg().ok_or(AnalysisError::NoData)
    }
}
