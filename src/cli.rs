use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one page view of a tutorial site into an HTML document.
    Render(RenderArgs),
    /// Print the parsed page registry as JSON lines.
    Pages(PagesArgs),
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Site root: a directory or an http/https URL.
    #[arg(long)]
    pub site: String,

    /// Current location, e.g. `index.html?page=setup` or `?page=setup`.
    #[arg(long)]
    pub location: Option<String>,

    /// Preference file holding the persisted theme.
    #[arg(long)]
    pub prefs: Option<String>,

    /// Whether the OS reports a dark color scheme.
    #[arg(long)]
    pub prefers_dark: bool,

    /// Site config YAML (defaults are used when omitted).
    #[arg(long)]
    pub config: Option<String>,

    /// Output file for the rendered document (stdout when omitted).
    #[arg(long)]
    pub out: Option<String>,

    /// Overwrite `--out` if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct PagesArgs {
    /// Site root: a directory or an http/https URL.
    #[arg(long)]
    pub site: String,

    /// Site config YAML (defaults are used when omitted).
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the theme that would be applied at startup.
    Show(ThemeArgs),
    /// Switch to the opposite theme and persist it.
    Toggle(ThemeArgs),
}

#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// Preference file holding the persisted theme.
    #[arg(long)]
    pub prefs: String,

    /// Whether the OS reports a dark color scheme.
    #[arg(long)]
    pub prefers_dark: bool,

    /// Site config YAML (defaults are used when omitted).
    #[arg(long)]
    pub config: Option<String>,
}
