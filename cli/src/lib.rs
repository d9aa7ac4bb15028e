use anyhow::{Context, Result};
use docsearch_core::{EngineConfig, Field, SearchEngine, SearchError, SearchHit};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of loading a document directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// Files that could not be read; loading carried on past them.
    pub skipped: Vec<SearchError>,
}

/// Read every regular file directly inside `dir` into `engine`, in file-name order.
///
/// The first line of each file is its title and the rest its body. Unreadable or
/// non-UTF-8 files are reported and skipped.
pub fn load_dir(engine: &mut SearchEngine, dir: &Path) -> Result<LoadReport> {
    if !dir.is_dir() {
        anyhow::bail!("document directory `{}` does not exist", dir.display());
    }
    tracing::info!(dir = %dir.display(), "indexing documents");

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).min_depth(1).max_depth(1).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
            Ok(_) => {}
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                tracing::warn!(path = %path.display(), error = %err, "skipping entry");
            }
        }
    }

    let mut report = LoadReport::default();
    for path in files {
        match fs::read_to_string(&path) {
            Ok(text) => {
                let id = engine.add_raw(&text);
                tracing::debug!(id, path = %path.display(), "indexed document");
                report.loaded += 1;
            }
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "skipping unreadable file");
                report.skipped.push(SearchError::io(path, source));
            }
        }
    }
    engine.log_summary();
    Ok(report)
}

/// Build an engine from `config` and fill it from `dir`.
pub fn build_engine(config: EngineConfig, dir: &Path) -> Result<(SearchEngine, LoadReport)> {
    let mut engine = SearchEngine::new(config).context("invalid engine configuration")?;
    let report = load_dir(&mut engine, dir)?;
    Ok((engine, report))
}

/// Load an [`EngineConfig`] from a JSON file.
pub fn read_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading config `{}`", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing config `{}`", path.display()))?;
    Ok(config)
}

pub fn render_hits<W: Write>(out: &mut W, hits: &[SearchHit]) -> std::io::Result<()> {
    if hits.is_empty() {
        writeln!(out, "No matching documents found.")?;
        return Ok(());
    }
    for hit in hits {
        writeln!(out, "Document ID: {}", hit.display_id)?;
        writeln!(out, "Title: {}", hit.title)?;
        if let Some(snippet) = &hit.snippet {
            writeln!(out, "Content: {snippet}...")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One line per file that was skipped while loading.
pub fn render_skipped<W: Write>(out: &mut W, report: &LoadReport) -> std::io::Result<()> {
    for err in &report.skipped {
        writeln!(out, "warning: skipped {err}")?;
    }
    Ok(())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> std::io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Interactive loop: pick a field (or `exit`), enter a query, print results.
/// Ends on `exit` or end of input.
pub fn run_repl<R: BufRead, W: Write>(engine: &SearchEngine, mut input: R, mut out: W) -> Result<()> {
    writeln!(out, "Welcome to the Simple Document Search Engine!")?;
    loop {
        let Some(choice) = prompt(
            &mut input,
            &mut out,
            "\nWould you like to search by 'title' or 'content'? (type 'exit' to quit): ",
        )?
        else {
            break;
        };
        let choice = choice.to_lowercase();
        if choice == "exit" {
            writeln!(out, "Terminating the session....")?;
            break;
        }
        let field: Field = match choice.parse() {
            Ok(field) => field,
            Err(_) => {
                writeln!(out, "Invalid option. Please enter 'title' or 'content'.")?;
                continue;
            }
        };
        let Some(query) = prompt(&mut input, &mut out, "Enter search query: ")? else {
            break;
        };
        let ids = engine.search(&query, field);
        render_hits(&mut out, &engine.hits(&ids, field))?;
    }
    Ok(())
}
