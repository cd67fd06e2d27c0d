use clap::Parser;
use wfs_export::core::retriever::WfsClient;
use wfs_export::utils::{logger, validation::Validate};
use wfs_export::{CliArgs, ExportEngine, ExportError, ExportPipeline, ExportSettings, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let settings = match args.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if args.json_logs {
        logger::init_json_logger(&settings.log_level);
    } else {
        logger::init_cli_logger(&settings.log_level, args.verbose);
    }

    tracing::info!("Starting wfs-export");
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        fail(&e);
    }

    if args.dry_run {
        print_plan(&settings)?;
        return Ok(());
    }

    let storage = LocalStorage::new(&settings.output_dir);
    let layers = settings.layers.clone();
    let formats = settings.formats.clone();
    let continue_on_error = settings.continue_on_error;

    let pipeline = match ExportPipeline::new(storage, settings) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };
    let engine = ExportEngine::new(pipeline)
        .with_formats(formats)
        .continue_on_error(continue_on_error);

    match engine.run(&layers).await {
        Ok(summary) if summary.is_success() => {
            for outcome in &summary.exported {
                println!("✅ {} ({} records)", outcome.location, outcome.records);
            }
        }
        Ok(summary) => {
            for failure in &summary.failures {
                eprintln!(
                    "❌ {} as {}: {}",
                    failure.layer,
                    failure.format,
                    failure.error.user_friendly_message()
                );
            }
            let exit_code = summary
                .failures
                .iter()
                .map(|f| f.error.exit_code())
                .max()
                .unwrap_or(1);
            std::process::exit(exit_code);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &ExportError) -> ! {
    tracing::error!("❌ Export failed: {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_plan(settings: &ExportSettings) -> anyhow::Result<()> {
    let storage = LocalStorage::new(&settings.output_dir);
    tracing::info!("🔍 DRY RUN MODE - no request is sent and no file is written");

    for layer in &settings.layers {
        for &format in &settings.formats {
            let request = wfs_export::ExportRequest::new(layer, format, settings.max_features);
            let url = WfsClient::build_url(&settings.wfs_url, &request)?;
            println!("GET {}", url);
            println!("  -> {}", storage.full_path(&request.output_filename()).display());
        }
    }
    Ok(())
}
