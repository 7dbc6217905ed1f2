//! Nimbus CLI
//!
//! Command-line interface for the Nimbus current-weather lookup service.

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nimbus_api::{ApiConfig, ApiServer, CurrentWeatherResponse, WeatherQueryParams};
use nimbus_core::types::{LookupResult, Source};
use nimbus_lookup::WeatherLookupService;

/// Nimbus - cache-aside current weather lookups
#[derive(Parser)]
#[command(name = "nimbus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Look up current weather once and print it
    Lookup {
        /// City name
        #[arg(long)]
        city: String,
        /// Two-letter state code
        #[arg(long)]
        state: Option<String>,
        /// Country code
        #[arg(long, default_value = "US")]
        country: String,
        /// Unit group (metric, us, uk, base)
        #[arg(long, default_value = "metric")]
        unit: String,
        /// Skip the cache: neither read nor write it
        #[arg(long)]
        no_cache: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "nimbus=debug,info"
    } else {
        "nimbus=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Lookup {
            city,
            state,
            country,
            unit,
            no_cache,
        } => {
            let params = WeatherQueryParams {
                city: Some(city),
                state,
                country: Some(country),
                unit: Some(unit),
            };
            cmd_lookup(params, !no_cache).await
        }
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let config = ApiConfig::from_env().context("Failed to load configuration")?;
    if !config.provider.has_api_key() {
        println!(
            "{}",
            "⚠️  VISUAL_CROSSING_API_KEY is not set; weather requests will return 503."
                .yellow()
                .bold()
        );
    }

    let server = ApiServer::new(config).context("Failed to initialize server")?;
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    println!("{}", "🌦  Starting Nimbus API server...".cyan().bold());
    println!("   {} http://{}", "Listening on:".green(), addr);
    println!("   {} http://{}/health", "Health check:".dimmed(), addr);
    println!("\n   Press Ctrl+C to stop.\n");

    server.run(addr).await?;

    Ok(())
}

/// Look up current weather once
async fn cmd_lookup(params: WeatherQueryParams, use_cache: bool) -> Result<()> {
    let query = params
        .validate()
        .map_err(|e| anyhow!(e.message().to_string()))?;

    let config = ApiConfig::from_env().context("Failed to load configuration")?;
    let service = WeatherLookupService::from_config(&config.cache, config.provider, config.lookup)
        .context("Failed to initialize lookup service")?;

    debug!(key = %query.cache_key(), use_cache, "Looking up");
    println!(
        "{} {}",
        "🔍 Looking up".cyan().bold(),
        query.location_descriptor()
    );

    let result = match service.lookup(&query, use_cache).await {
        Ok(result) => result,
        Err(e) => {
            println!("{} {}", "❌".red(), e.to_string().red());
            return Err(e.into());
        }
    };

    print_result(&result, query.city())
}

fn print_result(result: &LookupResult, city: &str) -> Result<()> {
    let source = match result.source {
        Source::Cache => "cache".green().bold(),
        Source::Api => "api".yellow().bold(),
    };
    let shaped = CurrentWeatherResponse::from_lookup(result, city);

    println!("\n{} {}", "Source:".dimmed(), source);
    println!("{} {}", "Location:".dimmed(), shaped.city);
    println!("{} {}", "Temperature:".dimmed(), display(&shaped.temperature));
    println!("{} {}", "Conditions:".dimmed(), display(&shaped.conditions));
    println!("{} {}", "Humidity:".dimmed(), display(&shaped.humidity));
    println!("{} {}", "Wind speed:".dimmed(), display(&shaped.wind_speed));

    println!("\n{}", "Record (JSON):".yellow().bold());
    println!("{}", serde_json::to_string_pretty(result.data.as_value())?);

    Ok(())
}

fn display(value: &Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
