// UI layer: a simple interactive menu using `dialoguer`, with `indicatif`
// spinners while requests are in flight. Each action is a small synchronous
// function; failures are printed and the menu keeps running.

use crate::api::{Benchling, HttpTransport};
use crate::catalog::{Catalog, MatchMode};
use crate::config::{self, Config};
use crate::format::{self, Format};
use crate::models::{Folder, FolderType, NewFolder, Sequence};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// One line per sequence: id, name, length, topology and folder.
pub fn describe_sequence(seq: &Sequence) -> String {
    format!(
        "{}\t{}\t{} bp\t{}\t{}",
        seq.id,
        seq.name,
        seq.bases.len(),
        if seq.circular { "circular" } else { "linear" },
        seq.folder.as_deref().unwrap_or("-")
    )
}

pub fn describe_folder(folder: &Folder) -> String {
    format!(
        "{}\t{}\t{} sequences",
        folder.id,
        folder.name,
        folder.sequences.len()
    )
}

/// Spinner shown while a blocking request runs.
pub fn spinner(msg: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Ask for an API key, save it to `~/.benchling/config.json` and return
/// the resulting configuration.
pub fn prompt_api_key() -> Result<Config> {
    let key: String = Password::new().with_prompt("Benchling API key").interact()?;
    let cfg = Config::new(key.trim());
    if let Some(path) = config::default_path() {
        if Confirm::new()
            .with_prompt(format!("Save key to {}?", path.display()))
            .default(true)
            .interact()?
        {
            cfg.save(&path).context("Failed to save configuration")?;
        }
    }
    Ok(cfg)
}

/// Main interactive menu. Runs a select loop until the user picks "Exit".
pub fn main_menu(mut api: Benchling<HttpTransport>) -> Result<()> {
    let mut catalog: Option<Catalog> = None;
    loop {
        let items = vec![
            "List folders",
            "Search sequences",
            "Show sequence",
            "Export sequence",
            "Open share link",
            "Create folder",
            "Refresh catalog",
            "Set API key",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        let result = match selection {
            0 => loaded(&api, &mut catalog).map(|cat| {
                for folder in cat.folders() {
                    println!("{}", describe_folder(folder));
                }
            }),
            1 => handle_search(&api, &mut catalog),
            2 => handle_show(&api),
            3 => handle_export(&api),
            4 => handle_share_link(&api),
            5 => handle_create_folder(&api).map(|_| catalog = None),
            6 => {
                catalog = None;
                loaded(&api, &mut catalog).map(|cat| {
                    println!(
                        "{} folders, {} sequences",
                        cat.folders().len(),
                        cat.sequences().len()
                    )
                })
            }
            7 => prompt_api_key().and_then(|cfg| {
                api = Benchling::from_config(&cfg)?;
                catalog = None;
                Ok(())
            }),
            8 => break,
            _ => Ok(()),
        };
        if let Err(e) = result {
            println!("{} failed: {:#}", items[selection], e);
        }
    }
    Ok(())
}

/// Load the catalog on first use.
fn loaded<'a>(api: &Benchling<HttpTransport>, catalog: &'a mut Option<Catalog>) -> Result<&'a Catalog> {
    if catalog.is_none() {
        let pb = spinner("Loading folders...")?;
        let cat = Catalog::load(api);
        pb.finish_and_clear();
        *catalog = Some(cat.context("Failed to load folders")?);
    }
    catalog
        .as_ref()
        .context("catalog not loaded")
}

fn handle_search(api: &Benchling<HttpTransport>, catalog: &mut Option<Catalog>) -> Result<()> {
    let fields = vec!["name", "id", "folder"];
    let field = fields[Select::new()
        .with_prompt("Field")
        .items(&fields)
        .default(0)
        .interact()?];
    let pattern: String = Input::new().with_prompt("Regular expression").interact_text()?;
    let cat = loaded(api, catalog)?;
    let hits = cat.filter_sequences(&[(field, pattern.as_str())], MatchMode::Regex)?;
    if hits.is_empty() {
        println!("No sequences match.");
    }
    for s in hits {
        println!("{}\t{}\t{}", s.id, s.name, s.folder.as_deref().unwrap_or("-"));
    }
    Ok(())
}

fn fetch_sequence(api: &Benchling<HttpTransport>) -> Result<Sequence> {
    let id: String = Input::new().with_prompt("Sequence id").interact_text()?;
    let pb = spinner("Fetching sequence...")?;
    let seq = api.sequences().get(&id);
    pb.finish_and_clear();
    Ok(seq?)
}

fn handle_show(api: &Benchling<HttpTransport>) -> Result<()> {
    let seq = fetch_sequence(api)?;
    println!("{}", describe_sequence(&seq));
    for a in &seq.annotations {
        println!("  {}\t{}..{}\t{}", a.name, a.start + 1, a.end, a.strand);
    }
    Ok(())
}

fn handle_export(api: &Benchling<HttpTransport>) -> Result<()> {
    let seq = fetch_sequence(api)?;
    let formats = [Format::GenBank, Format::Fasta];
    let names: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
    let fmt = formats[Select::new()
        .with_prompt("Format")
        .items(&names)
        .default(0)
        .interact()?];
    let default_path = format!("{}.{}", seq.name.replace(char::is_whitespace, "_"), fmt.extension());
    let path: String = Input::new()
        .with_prompt("Output file")
        .default(default_path)
        .interact_text()?;
    let path = PathBuf::from(path);
    format::write_file(&seq, fmt, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn handle_share_link(api: &Benchling<HttpTransport>) -> Result<()> {
    let link: String = Input::new().with_prompt("Share link").interact_text()?;
    let pb = spinner("Resolving share link...")?;
    let seq = api.sequence_from_share_link(link.trim());
    pb.finish_and_clear();
    println!("{}", describe_sequence(&seq?));
    Ok(())
}

fn handle_create_folder(api: &Benchling<HttpTransport>) -> Result<()> {
    let name: String = Input::new().with_prompt("Folder name").interact_text()?;
    let description: String = Input::new()
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;
    let types = [FolderType::Inventory, FolderType::Notebook, FolderType::All];
    let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    let folder_type = types[Select::new()
        .with_prompt("Folder type")
        .items(&names)
        .default(0)
        .interact()?];
    let new = NewFolder {
        name,
        description: Some(description).filter(|d| !d.is_empty()),
        owner: None,
        folder_type,
    };
    let pb = spinner("Creating folder...")?;
    let folder = api.folders().create(&new);
    pb.finish_and_clear();
    println!("Created {}", describe_folder(&folder?));
    Ok(())
}
