use std::path::Path;

use crate::{
    ark::ArkClient,
    cli::Cli,
    config::Config,
    download::capture_timestamp,
    error::Result,
    log_done, logger,
    report::{report_usage, RunSummary},
};

/// Runs the command line from the process working directory.
pub async fn run_cli(cli: &Cli) -> Result<RunSummary> {
    let cwd = std::env::current_dir()?;
    run_cli_in(cli, &cwd).await
}

/// Resolves configuration against `cwd`, then runs the pipeline.
/// Configuration errors return before any client is built.
pub async fn run_cli_in(cli: &Cli, cwd: &Path) -> Result<RunSummary> {
    let config = Config::from_cli(cli, cwd)?;
    let client = ArkClient::new(&config.ark)?;
    run(&config, &client).await
}

pub async fn run(config: &Config, client: &ArkClient) -> Result<RunSummary> {
    config.validate()?;
    config.ensure_output_dir()?;
    log::info!("Output directory: {}", config.output_dir.display());

    let request = config.generation_request();
    log::info!(
        "Prompt: {:?} (size: {}, watermark: {}, max images: {})",
        request.prompt,
        request.size,
        request.watermark,
        request.max_images
    );

    let result = {
        let _timer = logger::timer("Image generation");
        client.image().generate(&request).await?
    };
    log_done!("Received {} image(s)", result.images.len());

    let timestamp = capture_timestamp();
    let downloads = client
        .downloader()
        .save_all(
            &result.images,
            &config.output_dir,
            &timestamp,
            request.max_images,
            &request.size,
        )
        .await;

    let usage = result.usage_report();
    report_usage(usage.as_ref());

    Ok(RunSummary::new(
        config.output_dir.clone(),
        result.images.len(),
        downloads,
        usage,
    ))
}
