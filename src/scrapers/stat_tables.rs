use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Stat tables on a player page and the CSV each one is saved as
pub const PLAYER_PAGE_TABLES: &[(&str, &str)] = &[
    ("per_game", "per_game.csv"),
    ("totals", "totals.csv"),
    ("per_minute", "per_36_minutes.csv"),
    ("per_poss", "per_100_poss.csv"),
    ("advanced", "advanced.csv"),
    ("adj_shooting", "adjusted_shooting.csv"),
    ("pbp", "play_by_play.csv"),
    ("shooting", "shooting.csv"),
    ("highs", "game_highs.csv"),
    ("playoffs_series", "playoffs_series.csv"),
    ("all_star", "all_star_games.csv"),
    ("all_college_stats", "college_stats.csv"),
];

/// Header and body text of one `<table>`
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlTable {
    pub id: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .ok()
        .with_context(|| format!("Invalid selector {}", css))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn row_cells(row: &ElementRef, cell_selector: &Selector) -> Vec<String> {
    row.select(cell_selector).map(|cell| cell_text(&cell)).collect()
}

/// Find `table#<id>` and read it. The last header row names the columns;
/// header rows repeated inside the body are dropped.
pub fn find_table(document: &Html, id: &str) -> Result<Option<HtmlTable>> {
    let table_selector = selector(&format!("table#{}", id))?;
    let header_selector = selector("thead tr")?;
    let body_selector = selector("tbody tr, tfoot tr")?;
    let cell_selector = selector("th, td")?;

    let Some(table) = document.select(&table_selector).next() else {
        return Ok(None);
    };

    let headers = table
        .select(&header_selector)
        .last()
        .map(|tr| row_cells(&tr, &cell_selector))
        .unwrap_or_default();

    let mut rows = Vec::new();
    for tr in table.select(&body_selector) {
        let class = tr.value().attr("class").unwrap_or("");
        if class.split_whitespace().any(|c| c == "thead" || c == "over_header") {
            continue;
        }

        let mut cells = row_cells(&tr, &cell_selector);
        if cells.iter().all(|c| c.is_empty()) || cells == headers {
            continue;
        }
        if !headers.is_empty() {
            cells.resize(headers.len(), String::new());
        }
        rows.push(cells);
    }

    Ok(Some(HtmlTable {
        id: id.to_string(),
        headers,
        rows,
    }))
}

impl HtmlTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn keep_columns(mut self, keep: impl Fn(usize, &str) -> bool) -> Self {
        let kept: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(i, h)| keep(*i, h))
            .map(|(i, _)| i)
            .collect();

        let pick = |cells: &[String]| -> Vec<String> {
            kept.iter()
                .map(|&i| cells.get(i).cloned().unwrap_or_default())
                .collect()
        };
        self.headers = pick(&self.headers);
        self.rows = self.rows.iter().map(|row| pick(row)).collect();
        self
    }

    /// Drop columns whose header cell is blank
    pub fn without_unnamed_columns(self) -> Self {
        self.keep_columns(|_, header| !header.is_empty())
    }

    pub fn without_columns(self, names: &[&str]) -> Self {
        self.keep_columns(|_, header| !names.iter().any(|name| *name == header))
    }

    /// Keep only rows with a value in `column`. A table without it is unchanged.
    pub fn retain_rows_with(mut self, column: &str) -> Self {
        if let Some(index) = self.column_index(column) {
            self.rows.retain(|row| row.get(index).is_some_and(|v| !v.is_empty()));
        }
        self
    }

    pub fn write_csv<W: Write>(&self, wtr: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(wtr);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Rows as JSON objects keyed by header. Numbers stay numbers, blanks become null.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.clone(), json_cell(cell)))
                    .collect()
            })
            .collect()
    }
}

fn json_cell(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Null
    } else if let Ok(n) = cell.parse::<i64>() {
        Value::from(n)
    } else if let Some(n) = cell.parse::<f64>().ok().filter(|n| n.is_finite()) {
        Value::from(n)
    } else {
        Value::from(cell)
    }
}

/// Pull every known stat table off a player page, unnamed columns removed
pub fn extract_player_tables(html: &str) -> Result<Vec<(&'static str, HtmlTable)>> {
    let document = Html::parse_document(html);
    let mut tables = Vec::new();
    for &(id, file_name) in PLAYER_PAGE_TABLES {
        match find_table(&document, id)? {
            Some(table) => tables.push((file_name, table.without_unnamed_columns())),
            None => warn!("Table {} not found on page", id),
        }
    }
    Ok(tables)
}

/// Write each table to `dir/<file name>`
pub fn save_player_tables(tables: &[(&str, HtmlTable)], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(tables.len());
    for (file_name, table) in tables {
        let path = dir.join(file_name);
        table.save_csv(&path)?;
        info!("Saved {} ({} rows)", path.display(), table.rows.len());
        written.push(path);
    }
    Ok(written)
}
