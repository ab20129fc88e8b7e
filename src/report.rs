use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Serialize;

use crate::config::{distinct_symbols, Config};
use crate::stocks::{PriceTable, QuoteProvider};

/// One CSV line per configured ticker. Field renames fix the header to
/// `Ticker,YahooSymbol,Close_last,Close_prev,Var_diaria_%,Fecha_last`;
/// `None` renders as an empty cell.
#[derive(Debug, Serialize, PartialEq)]
struct ReportRow {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "YahooSymbol")]
    symbol: String,
    #[serde(rename = "Close_last")]
    close_last: Option<f64>,
    #[serde(rename = "Close_prev")]
    close_prev: Option<f64>,
    #[serde(rename = "Var_diaria_%")]
    var_pct: Option<f64>,
    #[serde(rename = "Fecha_last")]
    fecha_last: Option<NaiveDate>,
}

/// Rounds to two decimals, halves away from zero (`f64::round`).
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Day-over-day percentage change, rounded to two decimals. `None` when
/// the previous close is zero or the ratio is otherwise not finite; the
/// CSV must never carry an "inf" or "NaN" cell.
fn daily_change_pct(last: f64, prev: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    let pct = (last / prev - 1.0) * 100.0;
    pct.is_finite().then(|| round2(pct))
}

/// One row per mapping entry, in mapping order, whatever the table holds
/// for each symbol. Fewer than two observations leaves the numeric fields
/// empty; a single observation still carries its date.
fn build_rows(tickers: &[(String, String)], table: &PriceTable) -> Vec<ReportRow> {
    tickers
        .iter()
        .map(|(label, symbol)| {
            let series = table.series(symbol);
            let (close_last, close_prev, var_pct, fecha_last) = match series.as_slice() {
                [] => (None, None, None, None),
                [(only_date, _)] => (None, None, None, Some(*only_date)),
                [.., (_, prev), (last_date, last)] => (
                    Some(*last),
                    Some(*prev),
                    daily_change_pct(*last, *prev),
                    Some(*last_date),
                ),
            };
            ReportRow {
                ticker: label.clone(),
                symbol: symbol.clone(),
                close_last,
                close_prev,
                var_pct,
                fecha_last,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .wrap_err_with(|| format!("no se pudo crear {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Runs the whole report: fetch, derive rows, write the CSV. Fails before
/// touching the filesystem when the fetch comes back completely empty, so
/// a previous report is left as it was.
pub async fn generate(config: &Config, provider: &impl QuoteProvider) -> Result<PathBuf> {
    let symbols = distinct_symbols(&config.tickers);
    let table = provider.fetch_daily_closes(&symbols, &config.lookback).await?;

    if table.is_empty() {
        return Err(eyre!(
            "No se descargaron datos. Revisá conexión o símbolos."
        ));
    }

    let rows = build_rows(&config.tickers, &table);

    fs::create_dir_all(&config.output_dir)
        .wrap_err_with(|| format!("no se pudo crear {}", config.output_dir.display()))?;
    let path = config.output_file();
    write_csv(&path, &rows)?;

    Ok(path)
}
