use anyhow::{Context, Result};
use nostr_richtext_config::Config;
use nostr_richtext_engine::snapshot::{self, outline::metadata_outline};
use nostr_richtext_engine::{EngineOptions, ParsedDocument, RichTextEngine, SegmentKind, Tag};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;
use std::{env, fs, process};

/// Shape of the optional tags file: `tags = [["emoji", "wave", "https://..."]]`.
#[derive(Debug, Default, Deserialize)]
struct TagsFile {
    #[serde(default)]
    tags: Vec<Tag>,
}

fn engine_options(config: &Config) -> Result<EngineOptions> {
    let cache_capacity =
        NonZeroUsize::new(config.cache_capacity).context("cache_capacity must be at least 1")?;
    Ok(EngineOptions {
        cache_capacity,
        max_secret_depth: config.max_secret_depth,
        max_content_len: config.max_content_len,
    })
}

fn read_tags(path: &Path) -> Result<Vec<Tag>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tags file {}", path.display()))?;
    let file: TagsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse tags file {}", path.display()))?;
    Ok(file.tags)
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(engine: &RichTextEngine, doc: &ParsedDocument, tags: &[Tag]) -> String {
    let mut sections = vec![
        format!("== segments\n{}", snapshot::outline(doc)),
        format!("== render plan\n{}", snapshot::render_plan_outline(doc)),
    ];
    let metadata = metadata_outline(doc);
    if !metadata.is_empty() {
        sections.push(format!("== metadata\n{metadata}"));
    }
    for segment in doc.segments() {
        if segment.kind != SegmentKind::SecretBlock {
            continue;
        }
        if let Some(revealed) = engine.reveal(segment, tags, 1) {
            sections.push(format!(
                "== secret {:?}\n{}",
                segment.span,
                indent(&snapshot::outline(&revealed))
            ));
        }
    }
    sections.join("\n\n")
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if !(2..=3).contains(&args.len()) {
        eprintln!("Usage: {} <post-file> [tags.toml]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Using config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let engine = RichTextEngine::new(engine_options(&config)?);

    let post_path = Path::new(&args[1]);
    let content = fs::read_to_string(post_path)
        .with_context(|| format!("Failed to read post file {}", post_path.display()))?;
    let tags = match args.get(2) {
        Some(path) => read_tags(Path::new(path))?,
        None => vec![],
    };

    if nostr_richtext_engine::looks_like_markdown(&content) {
        log::info!("Content looks like markdown; showing rich-text segmentation anyway");
    }

    let doc = engine.parse(&content, &tags, None);
    println!("{}", report(&engine, &doc, &tags));
    Ok(())
}
