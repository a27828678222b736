use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::{PagesArgs, RenderArgs};
use crate::config::SiteConfig;
use crate::fetch::fetcher_for_site;
use crate::registry::PageRegistry;
use crate::shell::Shell;
use crate::theme::{FileStore, MemoryStore, ThemeController};

pub async fn render(args: RenderArgs) -> anyhow::Result<()> {
    if let Some(out) = &args.out
        && Path::new(out).exists()
        && !args.force
    {
        anyhow::bail!("render output already exists: {out}");
    }

    let config = SiteConfig::load_or_default(args.config.as_deref().map(Path::new))
        .context("load site config")?;
    let fetcher = fetcher_for_site(&args.site).context("open site")?;

    let mut shell = Shell::default();
    let theme = match &args.prefs {
        Some(prefs) => {
            ThemeController::start(FileStore::new(prefs), &config, args.prefers_dark, &mut shell)
                .applied()
        }
        None => {
            ThemeController::start(MemoryStore::new(), &config, args.prefers_dark, &mut shell)
                .applied()
        }
    };
    tracing::debug!(%theme, "applied theme");

    tracing::info!(site = %args.site, location = ?args.location, "render");
    let result =
        crate::view::render_page(&mut shell, fetcher.as_ref(), &config, args.location.as_deref())
            .await;

    write_output(args.out.as_deref(), args.force, &shell.to_html())?;

    let report = result.context("page view failed")?;
    if let Some(requested) = &report.not_found {
        tracing::warn!(
            requested = %requested,
            page = %report.active_id,
            "requested page not found; rendered fallback"
        );
    }
    Ok(())
}

pub async fn pages(args: PagesArgs) -> anyhow::Result<()> {
    let config = SiteConfig::load_or_default(args.config.as_deref().map(Path::new))
        .context("load site config")?;
    let fetcher = fetcher_for_site(&args.site).context("open site")?;

    let text = fetcher
        .fetch_text(&config.registry_path)
        .await
        .with_context(|| format!("fetch registry: {}", config.registry_path))?;
    let registry = PageRegistry::parse(&text, config.delimiter);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &registry {
        serde_json::to_writer(&mut out, record).context("serialize page record")?;
        out.write_all(b"\n").context("write newline")?;
    }
    out.flush().context("flush stdout")?;

    Ok(())
}

fn write_output(out: Option<&str>, force: bool, html: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        stdout
            .write_all(html.as_bytes())
            .context("write document to stdout")?;
        stdout.flush().context("flush stdout")?;
        return Ok(());
    };

    let out_path = PathBuf::from(out);
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options
        .open(&out_path)
        .with_context(|| format!("open output: {}", out_path.display()))?;
    file.write_all(html.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    file.flush()
        .with_context(|| format!("flush output: {}", out_path.display()))?;
    Ok(())
}
