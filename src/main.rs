use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    tutorialsite::logging::init().context("init logging")?;

    let cli = tutorialsite::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        tutorialsite::cli::Command::Render(args) => {
            tutorialsite::site::render(args).await.context("render")?;
        }
        tutorialsite::cli::Command::Pages(args) => {
            tutorialsite::site::pages(args).await.context("pages")?;
        }
        tutorialsite::cli::Command::Theme {
            command: tutorialsite::cli::ThemeCommand::Show(args),
        } => {
            tutorialsite::theme::show(args).context("theme show")?;
        }
        tutorialsite::cli::Command::Theme {
            command: tutorialsite::cli::ThemeCommand::Toggle(args),
        } => {
            tutorialsite::theme::toggle(args).context("theme toggle")?;
        }
    }

    Ok(())
}
