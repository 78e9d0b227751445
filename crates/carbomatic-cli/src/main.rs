mod calc_cmd;
mod config;
mod meal_plan_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use carbomatic_core::MealPlanRequest;

use calc_cmd::Weight;
use config::{CarbomaticConfig, CliOverrides};

#[derive(Parser)]
#[command(
    name = "carbomatic",
    about = "Marathon carb-loading calculator and meal plan drafter"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a carbomatic config file
    Init {
        /// Anthropic API key to store (ANTHROPIC_API_KEY still takes precedence)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API server
    Serve {
        /// Address to bind (overrides CARBOMATIC_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides CARBOMATIC_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Model used for meal plans (overrides CARBOMATIC_MODEL)
        #[arg(long)]
        model: Option<String>,
        /// Output token budget for meal plans
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// Calculate daily and total carb targets
    Calc {
        /// Body weight in kilograms
        #[arg(long, required_unless_present = "weight_lbs", conflicts_with = "weight_lbs")]
        weight_kg: Option<f64>,
        /// Body weight in pounds
        #[arg(long)]
        weight_lbs: Option<f64>,
        /// Loading days (2 = 12 g/kg, otherwise 8 g/kg)
        #[arg(long, required_unless_present = "intensity", conflicts_with = "intensity")]
        days: Option<i64>,
        /// Intensity level ("high" = 12 g/kg, otherwise 10 g/kg, always 3 days)
        #[arg(long)]
        intensity: Option<String>,
    },
    /// Draft a carb-loading meal plan
    MealPlan {
        /// Daily carbohydrate target in grams
        #[arg(long)]
        daily_carb_grams: f64,
        /// Number of days to plan
        #[arg(long)]
        days: i64,
        /// Dietary restriction (repeatable)
        #[arg(long = "restriction")]
        restrictions: Vec<String>,
        /// Meal preference (repeatable)
        #[arg(long = "preference")]
        preferences: Vec<String>,
        /// Model to use (overrides CARBOMATIC_MODEL)
        #[arg(long)]
        model: Option<String>,
        /// Output token budget
        #[arg(long)]
        max_tokens: Option<u32>,
    },
}

/// Execute the `carbomatic init` command: write config file.
fn cmd_init(api_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    cfg.server.bind = Some(CarbomaticConfig::DEFAULT_BIND.to_string());
    cfg.server.port = Some(CarbomaticConfig::DEFAULT_PORT);
    cfg.llm.api_key = api_key;

    config::save_config_to(&path, &cfg)?;

    println!("Config written to {}", path.display());
    match &cfg.llm.api_key {
        Some(key) => {
            let head: String = key.chars().take(8).collect();
            println!("  llm.api_key = {head}...");
        }
        None => println!("  llm.api_key not set; export ANTHROPIC_API_KEY before serving"),
    }
    println!();
    println!("Next: run `carbomatic serve` to start the API.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key, force)?;
        }
        Commands::Serve {
            bind,
            port,
            model,
            max_tokens,
        } => {
            let resolved = CarbomaticConfig::resolve(&CliOverrides {
                bind,
                port,
                model,
                max_tokens,
            })?;
            serve_cmd::run_serve(&resolved).await?;
        }
        Commands::Calc {
            weight_kg,
            weight_lbs,
            days,
            intensity,
        } => {
            let weight = match (weight_kg, weight_lbs) {
                (Some(kg), _) => Weight::Kilograms(kg),
                (None, Some(lbs)) => Weight::Pounds(lbs),
                (None, None) => anyhow::bail!("provide --weight-kg or --weight-lbs"),
            };
            calc_cmd::run_calc(weight, days, intensity)?;
        }
        Commands::MealPlan {
            daily_carb_grams,
            days,
            restrictions,
            preferences,
            model,
            max_tokens,
        } => {
            let resolved = CarbomaticConfig::resolve(&CliOverrides {
                model,
                max_tokens,
                ..Default::default()
            })?;
            let request = MealPlanRequest {
                daily_carb_grams,
                days,
                dietary_restrictions: restrictions,
                meal_preferences: preferences,
            };
            meal_plan_cmd::run_meal_plan(&resolved, request).await?;
        }
    }

    Ok(())
}
