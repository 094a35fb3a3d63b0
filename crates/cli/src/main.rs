//! Contract analyzer entry point
//!
//! Usage: `autolexis <contract.txt> [customer name]`

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use autolexis_analysis::ContractAnalyzer;
use autolexis_config::{load_settings, Settings};
use autolexis_core::{AlternateExtractor, VehicleLookup};
use autolexis_llm::{LlmSlaExtractor, OpenAIBackend, OpenAIConfig};
use autolexis_tools::NhtsaVehicleRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: autolexis <contract.txt> [customer name]");
    };
    let customer: Option<String> = {
        let rest: Vec<String> = args.collect();
        (!rest.is_empty()).then(|| rest.join(" "))
    };

    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("AUTOLEXIS_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::info!(
        environment = ?settings.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read contract file {path}"))?;

    let analyzer = build_analyzer(&settings);
    let report = analyzer
        .analyze(&text, customer.as_deref())
        .await
        .context("contract rejected")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Wire collaborators once; a collaborator that fails to build is skipped
fn build_analyzer(settings: &Settings) -> ContractAnalyzer {
    let mut builder = ContractAnalyzer::builder().settings(settings);

    if settings.llm.enabled {
        match OpenAIBackend::new(OpenAIConfig::from_settings(&settings.llm)) {
            Ok(backend) => {
                tracing::info!(
                    endpoint = %settings.llm.endpoint,
                    model = %settings.llm.model,
                    "LLM extraction enabled"
                );
                let extractor: Arc<dyn AlternateExtractor> =
                    Arc::new(LlmSlaExtractor::new(Arc::new(backend), &settings.llm));
                builder = builder.alternate(extractor);
            },
            Err(e) => tracing::warn!("Failed to initialize LLM backend: {}. Using patterns only.", e),
        }
    } else {
        tracing::info!("LLM extraction disabled, using patterns only");
    }

    if settings.vehicle_registry.enabled {
        match NhtsaVehicleRegistry::new(&settings.vehicle_registry) {
            Ok(registry) => {
                tracing::info!(
                    endpoint = %settings.vehicle_registry.endpoint,
                    "Vehicle registry enabled"
                );
                let lookup: Arc<dyn VehicleLookup> = Arc::new(registry);
                builder = builder.vehicle_lookup(lookup);
            },
            Err(e) => tracing::warn!("Failed to initialize vehicle registry: {}", e),
        }
    }

    builder.build()
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("autolexis={},warn", level).into()
    });

    // Logs go to stderr so stdout stays valid JSON
    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
