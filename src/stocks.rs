use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::offset::Utc;
use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz;
use color_eyre::eyre::Result;
use yahoo_finance_api as yahoo;

trait QuoteTime {
    fn time(&self) -> Option<DateTime<Utc>>;
}

impl QuoteTime for yahoo::Quote {
    fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp as i64, 0).single()
    }
}

/// Uniform "date -> {symbol -> adjusted close}" table, regardless of how
/// many symbols were requested. Dates ascend; a missing cell means no
/// observation for that symbol on that date.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    rows: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, symbol: &str, close: f64) {
        self.rows
            .entry(date)
            .or_default()
            .insert(symbol.to_string(), close);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The closing series for one symbol, date-ascending, gaps dropped.
    pub fn series(&self, symbol: &str) -> Vec<(NaiveDate, f64)> {
        self.rows
            .iter()
            .filter_map(|(date, closes)| closes.get(symbol).map(|close| (*date, *close)))
            .collect()
    }
}

/// Narrow seam over the quote source so row derivation and serialization
/// can be exercised against fixture tables.
#[async_trait]
pub trait QuoteProvider {
    async fn fetch_daily_closes(&self, symbols: &[String], lookback: &str) -> Result<PriceTable>;
}

pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            connector: yahoo::YahooConnector::new()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    /// One request per symbol, daily interval, adjusted closes. A symbol
    /// that errors or comes back empty is reported to stderr and skipped;
    /// it surfaces in the report as a row with missing fields.
    async fn fetch_daily_closes(&self, symbols: &[String], lookback: &str) -> Result<PriceTable> {
        let mut table = PriceTable::new();

        for symbol in symbols {
            let quotes = match self.connector.get_quote_range(symbol, "1d", lookback).await {
                Ok(response) => match response.quotes() {
                    Ok(quotes) => quotes,
                    Err(why) => {
                        eprintln!("{}: {}", symbol, why);
                        continue;
                    }
                },
                Err(why) => {
                    eprintln!("{}: {}", symbol, why);
                    continue;
                }
            };

            for quote in &quotes {
                // Trading date is the quote timestamp seen from the US
                // Eastern exchange clock.
                let date = match quote.time() {
                    Some(time) => time.with_timezone(&chrono_tz::US::Eastern).date_naive(),
                    None => continue,
                };
                table.insert(date, symbol, quote.adjclose);
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_table_is_empty() {
        assert!(PriceTable::new().is_empty());
    }

    #[test]
    fn series_is_date_ascending_regardless_of_insert_order() {
        let mut table = PriceTable::new();
        table.insert(date(2025, 8, 22), "GLD", 241.0);
        table.insert(date(2025, 8, 20), "GLD", 239.5);
        table.insert(date(2025, 8, 21), "GLD", 240.25);

        assert_eq!(
            table.series("GLD"),
            vec![
                (date(2025, 8, 20), 239.5),
                (date(2025, 8, 21), 240.25),
                (date(2025, 8, 22), 241.0),
            ]
        );
    }

    #[test]
    fn series_skips_dates_where_the_symbol_is_missing() {
        let mut table = PriceTable::new();
        table.insert(date(2025, 8, 20), "GLD", 239.5);
        table.insert(date(2025, 8, 20), "EWZ", 29.1);
        table.insert(date(2025, 8, 21), "EWZ", 29.3);

        assert_eq!(table.series("GLD"), vec![(date(2025, 8, 20), 239.5)]);
        assert!(table.series("^GSPC").is_empty());
    }

    #[test]
    fn insert_overwrites_duplicate_date_symbol_cells() {
        let mut table = PriceTable::new();
        table.insert(date(2025, 8, 20), "GLD", 239.5);
        table.insert(date(2025, 8, 20), "GLD", 240.0);

        assert_eq!(table.series("GLD"), vec![(date(2025, 8, 20), 240.0)]);
    }
}
