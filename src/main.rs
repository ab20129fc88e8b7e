mod config;
mod report;
mod stocks;

use chrono::Local;
use color_eyre::eyre::Result;
use dotenv::dotenv;

use config::Config;
use stocks::YahooProvider;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = Config::from_env();

    println!("=================================");
    println!(
        "Generando cierre tickers internacionales a las {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let provider = YahooProvider::new()?;
    let path = report::generate(&config, &provider).await?;

    println!("Archivo generado: {}", path.display());
    println!("===============================================");

    Ok(())
}
