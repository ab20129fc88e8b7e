use std::env;
use std::path::PathBuf;

// Mapping "our tickers" -> "Yahoo symbols". Output rows follow this order.
const TICKER_MAP: &[(&str, &str)] = &[
    ("SPX", "^GSPC"),
    ("NDX", "^NDX"),
    ("VIX", "^VIX"),
    ("ILF", "ILF"),
    ("EWZ", "EWZ"),
    ("EMB", "EMB"),
    ("/CL", "CL=F"), // WTI Crude Oil futures
    ("GLD", "GLD"),
    ("XLE", "XLE"),
    ("XLC", "XLC"),
    ("XLP", "XLP"),
    ("XLK", "XLK"),
    ("XLV", "XLV"),
    ("QTUM", "QTUM"),
    ("SOXX", "SOXX"),
    ("TSLA", "TSLA"),
    ("AAPL", "AAPL"),
    ("GOOG", "GOOG"),
    ("NVDA", "NVDA"),
    ("META", "META"),
    ("MSFT", "MSFT"),
    ("AMZN", "AMZN"),
    ("RGTI", "RGTI"),
    ("QBTS", "QBTS"),
    ("IONQ", "IONQ"),
];

const DEFAULT_OUTPUT_DIR: &str = "cierre-jornada";
const OUTPUT_FILE: &str = "variacion_diaria.csv";

// Yahoo range token; 30 calendar days, enough for two trading days even
// across holidays.
const LOOKBACK: &str = "1mo";

/// Run configuration. Built from the compiled-in ticker map, with the
/// output directory overridable through `CIERRE_OUTPUT_DIR`.
pub struct Config {
    /// Ordered (label, Yahoo symbol) pairs. Labels are unique; two labels
    /// may point at the same symbol.
    pub tickers: Vec<(String, String)>,
    pub output_dir: PathBuf,
    pub lookback: String,
}

impl Config {
    pub fn from_env() -> Self {
        let output_dir = env::var("CIERRE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Config {
            tickers: TICKER_MAP
                .iter()
                .map(|(label, symbol)| (label.to_string(), symbol.to_string()))
                .collect(),
            output_dir,
            lookback: LOOKBACK.to_string(),
        }
    }

    pub fn output_file(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE)
    }
}

/// Distinct Yahoo symbols from the mapping, first-seen order preserved.
pub fn distinct_symbols(tickers: &[(String, String)]) -> Vec<String> {
    let mut symbols = Vec::new();
    for (_, symbol) in tickers {
        if !symbols.contains(symbol) {
            symbols.push(symbol.clone());
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(l, s)| (l.to_string(), s.to_string()))
            .collect()
    }

    #[test]
    fn distinct_symbols_dedups_preserving_first_seen_order() {
        let tickers = pairs(&[
            ("SPX", "^GSPC"),
            ("GOLD", "GLD"),
            ("SP500", "^GSPC"),
            ("OIL", "CL=F"),
        ]);
        assert_eq!(distinct_symbols(&tickers), vec!["^GSPC", "GLD", "CL=F"]);
    }

    #[test]
    fn output_file_is_fixed_name_under_output_dir() {
        let config = Config {
            tickers: vec![],
            output_dir: PathBuf::from("/tmp/reportes"),
            lookback: "1mo".to_string(),
        };
        assert_eq!(
            config.output_file(),
            Path::new("/tmp/reportes/variacion_diaria.csv")
        );
    }

    #[test]
    fn from_env_uses_compiled_in_mapping() {
        let config = Config::from_env();
        assert_eq!(config.tickers.len(), 25);
        assert_eq!(config.tickers[0], ("SPX".to_string(), "^GSPC".to_string()));
        assert_eq!(config.lookback, "1mo");
    }
}
