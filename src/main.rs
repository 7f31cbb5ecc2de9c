use clap::Parser;
use energy_predictor::config::{Command, LogFormat, PredictArgs};
use energy_predictor::core::export::export_csv;
use energy_predictor::utils::error::ErrorSeverity;
use energy_predictor::utils::{logger, validation::Validate};
use energy_predictor::{
    insights_for, CliConfig, DerivedSummary, FeatureDeriver, FeatureRecord, Insight,
    JsonModelLoader, LocalStorage, ModelRegistry, PredictionResult, PredictorConfig,
    PredictorError, PredictorGateway, RawInput, Result,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct PredictionReport<'a> {
    input: &'a RawInput,
    predictions: &'a [PredictionResult],
    features: &'a FeatureRecord,
    summary: DerivedSummary,
    insights: &'a [Insight],
    exported_to: Option<String>,
}

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting energy-predictor");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(cli: &CliConfig) -> Result<()> {
    let config = PredictorConfig::from_file(&cli.config)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded from {}", cli.config);

    // 模型只在啟動時載入一次
    let loader = JsonModelLoader::new(config.model_base_dir());
    let registry = Arc::new(ModelRegistry::load(&config.models, &loader)?);
    let gateway = PredictorGateway::new(registry);

    let deriver = FeatureDeriver::new(config.derivation_settings());
    gateway.warn_on_schema_drift(deriver.schema());

    match &cli.command {
        Command::Models => {
            for name in gateway.model_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Predict(args) => predict(&config, &deriver, &gateway, args),
    }
}

fn predict(
    config: &PredictorConfig,
    deriver: &FeatureDeriver,
    gateway: &PredictorGateway,
    args: &PredictArgs,
) -> Result<()> {
    let raw = args.raw_input();
    let features = deriver.derive(&raw)?;

    let predictions = if args.all_models {
        gateway.predict_all(&features)?
    } else {
        let model_name = match &args.model {
            Some(name) => name.clone(),
            None => gateway
                .model_names()
                .into_iter()
                .next()
                .ok_or_else(|| PredictorError::MissingConfigError {
                    field: "models".to_string(),
                })?,
        };
        vec![gateway.predict(&model_name, &features)?]
    };

    for prediction in &predictions {
        tracing::info!("🔋 {}: {}", prediction.model, prediction);
    }

    let insights = insights_for(&raw, &features, config.large_household_occupants());
    let summary = DerivedSummary::from_features(&features);

    let exported_to = if args.export {
        let storage = LocalStorage::new(config.export_dir().to_string_lossy());
        Some(export_csv(&storage, &config.export_filename(), &features)?)
    } else {
        None
    };

    if args.json {
        let report = PredictionReport {
            input: &raw,
            predictions: &predictions,
            features: &features,
            summary,
            insights: &insights,
            exported_to,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for prediction in &predictions {
        println!(
            "🔋 Predicted Energy Consumption ({}): {}",
            prediction.model, prediction
        );
    }

    if !insights.is_empty() {
        println!();
        println!("📌 Insights Based on Your Inputs");
        for insight in &insights {
            println!("  - {}", insight);
        }
    }

    println!();
    println!("📊 Derived Features");
    println!("{}", summary);

    if let Some(location) = exported_to {
        println!();
        println!("📎 Feature record saved to: {}", location);
    }

    Ok(())
}
