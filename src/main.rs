use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckmedia::cli::{Cli, Command, PollArgs};
use deckmedia::config::DeckMediaConfig;
use deckmedia::ui::{self, PollProgress};
use deckmedia::{Job, KieClient, PollSettings, VideoGenerator, VideoOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = DeckMediaConfig::load(cli.config.as_deref())?;
    let api_key = config.resolve_api_key(cli.api_key.as_deref())?;
    let client = KieClient::with_urls(api_key, config.base_url.clone(), config.upload_url.clone())
        .context("failed to build HTTP client")?;
    let generator = VideoGenerator::new(client);

    match cli.command {
        Command::Video {
            prompt,
            image,
            model,
            aspect_ratio,
            output,
            no_wait,
            poll,
        } => {
            let options = VideoOptions {
                model: match model {
                    Some(m) => m.into(),
                    None => config.model()?,
                },
                aspect_ratio: match aspect_ratio {
                    Some(a) => a.into(),
                    None => config.aspect_ratio()?,
                },
                wait: !no_wait,
                poll: poll_settings(&config, &poll)?,
            };

            let progress = PollProgress::start(&format!("Submitting: {}", preview(&prompt)));
            let result = match &image {
                Some(path) => {
                    generator
                        .image_to_video(&prompt, path, options, |job, n| progress.update(job, n))
                        .await
                }
                None => {
                    generator
                        .text_to_video(&prompt, options, |job, n| progress.update(job, n))
                        .await
                }
            };
            let job = finish(&progress, result)?;
            save_output(&generator, &progress, &job, output.as_deref()).await?;
        }
        Command::Status { task_id, json } => {
            let job = generator.poller().fetch_status(&task_id).await?;
            if json {
                ui::print_job_json(&job);
            } else {
                ui::print_job_summary(&job);
            }
        }
        Command::Wait {
            task_id,
            output,
            poll,
        } => {
            let settings = poll_settings(&config, &poll)?;
            let progress = PollProgress::start(&format!("Waiting for {task_id}"));
            let result = generator
                .poller()
                .wait_until_done_with(
                    &task_id,
                    settings.timeout,
                    settings.poll_interval,
                    |job, n| progress.update(job, n),
                )
                .await;
            let job = finish(&progress, result)?;
            save_output(&generator, &progress, &job, output.as_deref()).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "deckmedia=debug" } else { "deckmedia=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn poll_settings(config: &DeckMediaConfig, args: &PollArgs) -> Result<PollSettings> {
    let base = config.poll_settings()?;
    Ok(PollSettings::from_secs(
        args.timeout.unwrap_or(base.timeout.as_secs()),
        args.poll_interval.unwrap_or(base.poll_interval.as_secs()),
    ))
}

fn finish(progress: &PollProgress, result: Result<Job, deckmedia::PollError>) -> Result<Job> {
    match result {
        Ok(job) => {
            progress.complete(&job);
            Ok(job)
        }
        Err(err) => {
            progress.fail(&err);
            Err(err.into())
        }
    }
}

async fn save_output(
    generator: &VideoGenerator,
    progress: &PollProgress,
    job: &Job,
    output: Option<&Path>,
) -> Result<()> {
    let (Some(path), Some(url)) = (output, job.primary_url()) else {
        return Ok(());
    };
    let bytes = generator
        .client()
        .download(url, path)
        .await
        .with_context(|| format!("failed to download {url}"))?;
    progress.note(&format!("Downloaded {bytes} bytes to {}", path.display()));
    Ok(())
}

fn preview(prompt: &str) -> String {
    let head: String = prompt.chars().take(50).collect();
    if prompt.chars().count() > 50 {
        format!("{head}...")
    } else {
        head
    }
}
