mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use slack2sheets::config::{ServerConfig, load_settings};
use slack2sheets::logging;
use slack2sheets::metadata::ChannelType;
use slack2sheets::pipeline::Pipeline;
use slack2sheets::sheets::SheetsClient;
use slack2sheets::slack::{EventState, SlackClient, events_router};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    logging::init(cli.json_logs);

    let settings = load_settings()?;
    tracing::info!(
        channels = ?settings.digest.channels,
        spreadsheet = %settings.sheets.spreadsheet_id,
        "Configuration loaded"
    );

    let slack = Arc::new(SlackClient::new(settings.slack.clone())?);
    let sheets = Arc::new(SheetsClient::new(&settings.sheets)?);
    let pipeline = Arc::new(Pipeline::new(slack, sheets.clone(), &settings));

    match cli.command {
        Commands::Digest { reset } => {
            if reset {
                pipeline.reset_digests().await?;
            }
            let report = pipeline.run_digests().await;
            for digest in report.digests() {
                println!("{}", digest.render());
            }
            for channel in &report.channels {
                if channel.digest.is_none() {
                    println!("⚠️  {}", channel);
                }
            }
            Ok(report.exit_code())
        }
        Commands::Sync { channel } => {
            let tally = pipeline.sync_channel_messages(&channel).await?;
            println!(
                "#{}: {} updated, {} appended, {} failed",
                channel.trim_start_matches('#'),
                tally.updated,
                tally.appended,
                tally.failures.len()
            );
            Ok(if tally.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Channels => {
            for channel in pipeline.list_channels().await? {
                let visibility = match channel.channel_type {
                    ChannelType::PublicChannel => "public",
                    ChannelType::PrivateChannel => "private",
                };
                let membership = if channel.is_member {
                    "member"
                } else {
                    "not a member (/invite the bot)"
                };
                println!(
                    "{:<32} {:<12} {:<8} {}",
                    channel.display_name(),
                    channel.id,
                    visibility,
                    membership
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let title = sheets
                .spreadsheet_title(&settings.sheets.spreadsheet_id)
                .await?;
            println!("✅ Connected to spreadsheet \"{}\"", title);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve => serve(pipeline, &settings.server).await,
    }
}

async fn serve(pipeline: Arc<Pipeline>, server: &ServerConfig) -> anyhow::Result<ExitCode> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Listening for Slack events on /slack/events");

    axum::serve(listener, events_router(EventState::new(pipeline)))
        .with_graceful_shutdown(async {
            let signal_name = shutdown_signal().await;
            tracing::info!(
                signal = %signal_name,
                "Received shutdown signal, initiating graceful shutdown"
            );
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(ExitCode::SUCCESS)
}

/// Wait for SIGINT, SIGTERM or SIGQUIT on Unix, Ctrl+C elsewhere
async fn shutdown_signal() -> String {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
            signal(SignalKind::quit()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm), Ok(mut sigquit)) => tokio::select! {
                _ = sigint.recv() => "SIGINT (Ctrl+C)".to_string(),
                _ = sigterm.recv() => "SIGTERM".to_string(),
                _ = sigquit.recv() => "SIGQUIT".to_string(),
            },
            _ => {
                tracing::warn!("Failed to install Unix signal handlers, falling back to Ctrl+C");
                ctrl_c().await
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await
    }
}

async fn ctrl_c() -> String {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    "Ctrl+C".to_string()
}
