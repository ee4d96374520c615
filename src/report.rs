use serde::Serialize;

use crate::{
    analysis::{Analyser, AverageVolume, GapUp, HighLow, MovingAverage},
    config::AnalysisConfig,
    error::AnalysisError,
    model::{Price, Stock},
};

/// Every analysis run over one stock with a shared [`AnalysisConfig`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub code: String,
    pub days: usize,
    pub average_volume: f64,
    pub high: Price,
    pub low: Price,
    pub moving_average_days: usize,
    pub moving_average: Price,
    pub last_gap_up: Option<String>,
}

impl StockReport {
    /// Fails on the first analysis that fails, including on a stock with no
    /// trading days.
    pub fn build(stock: &Stock, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let mut volume = AverageVolume::new();
        stock.analyse(&mut volume)?;

        let mut high_low = HighLow::new();
        stock.analyse(&mut high_low)?;
        let (high, low) = high_low.result()?;

        let mut moving_average =
            MovingAverage::new(config.moving_average_days).with_policy(config.average_policy);
        stock.analyse(&mut moving_average)?;

        let mut gap_up = GapUp::new(config.gap_up_delta);
        stock.analyse(&mut gap_up)?;

        Ok(Self {
            code: stock.code().to_owned(),
            days: stock.trades().len(),
            average_volume: volume.result()?,
            high,
            low,
            moving_average_days: config.moving_average_days,
            moving_average: moving_average.result()?,
            last_gap_up: gap_up.result()?.map(|day| day.date().to_owned()),
        })
    }
}
