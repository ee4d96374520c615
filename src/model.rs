use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{analysis::Analyser, error::AnalysisError};

pub type Price = f64;

/// One stock's trading day. Immutable once built.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingData {
    date: String,
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    volume: u64,
}

impl TradingData {
    pub fn new(
        date: impl Into<String>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: u64,
    ) -> Self {
        Self {
            date: date.into(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn open(&self) -> Price {
        self.open
    }

    pub fn high(&self) -> Price {
        self.high
    }

    pub fn low(&self) -> Price {
        self.low
    }

    pub fn close(&self) -> Price {
        self.close
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }
}

/// A stock code and its trading days in load order.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    code: String,
    trades: Vec<TradingData>,
}

impl Stock {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            trades: Vec::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn trades(&self) -> &[TradingData] {
        &self.trades
    }

    pub fn add_day_data(&mut self, day: TradingData) {
        self.trades.push(day);
    }

    /// Feeds every stored day to `analyser` in storage order.
    ///
    /// The analyser is not reset first; call [`Analyser::reset`] to reuse an
    /// instance for a fresh traversal. The first processing error stops the
    /// traversal.
    pub fn analyse<A>(&self, analyser: &mut A) -> Result<(), AnalysisError>
    where
        A: Analyser + ?Sized,
    {
        for day in &self.trades {
            analyser.process(day)?;
        }

        Ok(())
    }
}

/// Every known stock, keyed by code. Passed explicitly to loaders.
#[derive(Default, Debug)]
pub struct StockCollection {
    stocks: HashMap<String, Stock>,
}

impl StockCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stock for `code`, creating an empty one on first use.
    pub fn get_stock(&mut self, code: &str) -> &mut Stock {
        self.stocks
            .entry(code.to_owned())
            .or_insert_with(|| Stock::new(code))
    }

    pub fn get(&self, code: &str) -> Option<&Stock> {
        self.stocks.get(code)
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.stocks.keys().map(String::as_str).sorted().collect_vec()
    }
}
