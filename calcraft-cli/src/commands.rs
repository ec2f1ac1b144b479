use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use async_trait::async_trait;
use calcraft_core::{
    MonthConfig, PageOptions,
    compose::{MonthPage, compose_year},
    export::{Exporter, PageSink},
    grid::{self, GridCell},
    ics::parse_ics,
    sources::SourceLibrary,
};

/// Compose command parameters
pub struct ComposeParams {
    pub year: i32,
    pub ics: Vec<String>,
    pub rows: u32,
    pub output: String,
}

/// Parse an ICS file and print its events
pub async fn events_command(file: String, json: bool) -> Result<()> {
    let content = fs::read_to_string(&file)?;
    let events = parse_ics(&content);

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events found in {}", file);
        return Ok(());
    }

    println!("✓ Parsed {} events from {}", events.len(), file);
    for event in &events {
        print!("  {}  {}", event.start.format("%Y-%m-%d %H:%M"), event.title);
        if let Some(end) = event.end {
            print!("  (until {})", end.format("%Y-%m-%d %H:%M"));
        }
        println!();
        if let Some(ref description) = event.description {
            println!("      {}", description.replace('\n', " "));
        }
    }

    Ok(())
}

/// Print one month's grid as a text table
pub async fn grid_command(month: u32, year: i32, rows: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        anyhow::bail!("month must be between 1 and 12, got {}", month);
    }
    let month = month - 1;

    let cells = grid::layout(month, year, rows);
    let columns = grid::columns_for(month, year, rows) as usize;
    let width = cells
        .iter()
        .map(|cell| match cell {
            GridCell::Header { label } => label.len(),
            _ => 2,
        })
        .max()
        .unwrap_or(3);

    println!("{} {}", grid::month_name(month), year);
    for chunk in cells.chunks(columns) {
        let line: Vec<String> = chunk
            .iter()
            .map(|cell| match cell {
                GridCell::Header { label } => format!("{label:>width$}"),
                GridCell::Filler => " ".repeat(width),
                GridCell::Day { number } => format!("{number:>width$}"),
            })
            .collect();
        println!("{}", line.join(" "));
    }

    Ok(())
}

/// Compose twelve month pages and export them sequentially as JSON files
pub async fn compose_command(params: ComposeParams) -> Result<()> {
    let mut library = SourceLibrary::new();
    for path in &params.ics {
        let content = fs::read_to_string(path)?;
        let name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path);
        let source = library.import(name, &content);
        println!("✓ Imported {} ({} events)", source.name, source.events.len());
    }

    let options = PageOptions {
        grid_rows: params.rows,
        ..PageOptions::default()
    };
    let pages = compose_year(
        &MonthConfig::year_set(params.year),
        &options,
        &library.active_events(),
    );

    fs::create_dir_all(&params.output)?;
    let mut sink = JsonDirectorySink {
        dir: PathBuf::from(&params.output),
    };

    println!("Exporting {} pages...", pages.len());
    Exporter::new().export(&pages, &mut sink).await?;
    println!("✓ Pages saved to: {}", params.output);

    Ok(())
}

/// Writes each page as a pretty-printed JSON document
struct JsonDirectorySink {
    dir: PathBuf,
}

#[async_trait]
impl PageSink for JsonDirectorySink {
    async fn write_page(&mut self, _index: usize, page: &MonthPage) -> calcraft_core::Result<()> {
        let file = self.dir.join(format!("calcraft-{}-{}.json", page.year, page.name));
        fs::write(&file, serde_json::to_string_pretty(page)?)?;
        tracing::debug!("Wrote {}", file.display());
        Ok(())
    }
}
