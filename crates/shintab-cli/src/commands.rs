use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use shintab_sdk::{
    Dashboard, DashboardConfig, FsBlobStore, FsPrefStore, ImageId, Settings, TimeFormat,
};

use crate::cli::{AddArgs, Cli, Command, ListArgs, ReconcileArgs, RemoveArgs, SettingsArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let dashboard = open_dashboard(&cli)?;

    match cli.command {
        Command::Init => init(&dashboard),
        Command::Add(args) => add(&dashboard, args),
        Command::List(args) => list(&dashboard, args),
        Command::Remove(args) => remove(&dashboard, args),
        Command::Clear => clear(&dashboard),
        Command::Reconcile(args) => reconcile(&dashboard, args),
        Command::Settings(args) => settings(&dashboard, args),
    }
}

fn open_dashboard(cli: &Cli) -> anyhow::Result<Dashboard> {
    let sweep = matches!(
        cli.command,
        Command::Reconcile(ReconcileArgs {
            sweep_orphans: true
        })
    );
    let blobs = Arc::new(FsBlobStore::new(cli.store_dir.join("blobs")));
    let prefs = Arc::new(FsPrefStore::new(cli.store_dir.join("prefs.json")));
    Ok(Dashboard::new(
        blobs,
        prefs,
        DashboardConfig {
            sweep_orphan_blobs: sweep,
            ..Default::default()
        },
    ))
}

fn init(dashboard: &Dashboard) -> anyhow::Result<()> {
    // First touch of either store creates its layout.
    dashboard.list_images()?;
    dashboard.blobs().ids()?;
    println!("{}", "Initialized shintab store.".green());
    Ok(())
}

fn add(dashboard: &Dashboard, args: AddArgs) -> anyhow::Result<()> {
    let mut files = Vec::new();
    for path in &args.files {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        files.push((data, content_type_for(path).to_string()));
    }

    let report = dashboard.upload_batch(files);
    for id in &report.stored {
        println!("{} {id}", "stored".green());
    }
    if report.failed > 0 {
        eprintln!(
            "{}",
            format!("{} of {} files failed", report.failed, args.files.len()).red()
        );
    }
    println!(
        "Uploaded {} image(s), {} failed.",
        report.stored.len(),
        report.failed
    );
    Ok(())
}

fn list(dashboard: &Dashboard, args: ListArgs) -> anyhow::Result<()> {
    let entries = dashboard.list_images()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No uploaded images.");
        return Ok(());
    }
    for entry in entries {
        match dashboard.blobs().get(&entry.id)? {
            Some(blob) => println!(
                "{}  {:>8} bytes  {}  {}",
                entry.id,
                blob.len(),
                blob.content_type,
                blob.created_at.format("%Y-%m-%d %H:%M:%S")
            ),
            None => println!("{}  {}", entry.id, "missing blob".yellow()),
        }
    }
    Ok(())
}

fn remove(dashboard: &Dashboard, args: RemoveArgs) -> anyhow::Result<()> {
    let id: ImageId = args.id.parse()?;
    dashboard.remove_image(&id)?;
    println!("{} {id}", "removed".green());
    Ok(())
}

fn clear(dashboard: &Dashboard) -> anyhow::Result<()> {
    dashboard.clear_images()?;
    println!("{}", "Cleared uploaded images.".green());
    Ok(())
}

fn reconcile(dashboard: &Dashboard, _args: ReconcileArgs) -> anyhow::Result<()> {
    let report = dashboard.reconcile()?;
    if report.is_clean() {
        println!("{}", "Stores are consistent.".green());
    } else {
        println!(
            "Dropped {} stale index entr{}, {} orphan blob(s).",
            report.stale_entries_dropped,
            if report.stale_entries_dropped == 1 { "y" } else { "ies" },
            report.orphan_blobs_dropped
        );
    }
    Ok(())
}

fn settings(dashboard: &Dashboard, args: SettingsArgs) -> anyhow::Result<()> {
    let mut current = dashboard.settings()?;

    if !args.set.is_empty() {
        for pair in &args.set {
            apply_setting(&mut current, pair)?;
        }
        dashboard.save_settings(&current)?;
        println!("{}", "Settings saved.".green());
    }

    println!("blur                 {}", current.blur);
    println!("overlay_opacity      {}", current.overlay_opacity);
    println!("rotate_interval_secs {}", current.rotate_interval_secs);
    println!("randomize            {}", current.randomize);
    println!(
        "time_format          {}",
        match current.time_format {
            TimeFormat::TwelveHour => "12h",
            TimeFormat::TwentyFourHour => "24h",
        }
    );
    println!("show_quotes          {}", current.show_quotes);
    Ok(())
}

fn apply_setting(settings: &mut Settings, pair: &str) -> anyhow::Result<()> {
    let (key, value) = pair
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got {pair:?}"))?;
    match key {
        "blur" => settings.blur = value.parse().context("blur takes a number")?,
        "overlay_opacity" => {
            settings.overlay_opacity = value.parse().context("overlay_opacity takes a number")?
        }
        "rotate_interval_secs" => {
            settings.rotate_interval_secs =
                value.parse().context("rotate_interval_secs takes a number")?
        }
        "randomize" => settings.randomize = value.parse().context("randomize takes true/false")?,
        "show_quotes" => {
            settings.show_quotes = value.parse().context("show_quotes takes true/false")?
        }
        "time_format" => {
            settings.time_format = match value {
                "12h" => TimeFormat::TwelveHour,
                "24h" => TimeFormat::TwentyFourHour,
                other => bail!("time_format takes 12h or 24h, got {other:?}"),
            }
        }
        other => bail!("unknown setting {other:?}"),
    }
    Ok(())
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
