use chrono::NaiveDate;
use std::io::{Read, Write};
use tracing::warn;

/// Position of the unlabeled home/away column ("@" for road games)
const AWAY_MARKER_COLUMN: usize = 5;
const DATE_FORMAT: &str = "%Y-%m-%d";

const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("FG%", "fg_pct"),
    ("3P", "three_p"),
    ("3PA", "three_pa"),
    ("3P%", "three_p_pct"),
    ("2P", "two_p"),
    ("2PA", "two_pa"),
    ("2P%", "two_p_pct"),
    ("eFG%", "efg_pct"),
    ("FT%", "ft_pct"),
    ("+/-", "plus_minus"),
];

/// Column types used in the generated `create table` statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Numeric,
    Text,
    Timestamp,
    Boolean,
}

impl SqlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::Numeric => "numeric",
            SqlType::Text => "text",
            SqlType::Timestamp => "timestamp",
            SqlType::Boolean => "boolean",
        }
    }
}

/// One season of cleaned game logs, ready to export
#[derive(Debug, Clone)]
pub struct GameLogTable {
    pub season_start: i32,
    pub season_end: i32,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Lower-case, underscore-separated column names the database accepts
pub fn clean_column_name(column: &str) -> String {
    if let Some((_, renamed)) = COLUMN_RENAMES.iter().find(|(from, _)| *from == column) {
        return renamed.to_string();
    }
    column.trim().to_lowercase().replace(' ', "_")
}

/// "game_logs_2013.csv" -> 2013
pub fn season_end_from_file_name(file_name: &str) -> Option<i32> {
    file_name
        .strip_prefix("game_logs_")?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false)
}

/// Infer a column type from its values the way a dataframe would
pub fn infer_sql_type(column: &str, values: &[&str]) -> SqlType {
    match column {
        "is_away" => return SqlType::Boolean,
        "date" => return SqlType::Timestamp,
        _ => {}
    }
    if values.is_empty() {
        return SqlType::Text;
    }

    let filled: Vec<&str> = values.iter().copied().filter(|v| !v.is_empty()).collect();
    if filled.len() == values.len() && filled.iter().all(|v| v.parse::<i64>().is_ok()) {
        SqlType::Integer
    } else if filled.iter().all(|v| is_numeric(v)) {
        // Gaps turn integer columns into floats
        SqlType::Numeric
    } else {
        SqlType::Text
    }
}

/// Clean one season's raw game log export
pub fn prepare_season<R: Read>(rdr: R, season_end: i32) -> Result<GameLogTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);

    let mut columns = Vec::new();
    let mut kept_indices = Vec::new();
    for (index, header) in reader.headers()?.iter().enumerate() {
        if index == AWAY_MARKER_COLUMN {
            continue;
        }
        let name = if header.is_empty() {
            format!("unnamed_{}", index)
        } else {
            clean_column_name(header)
        };
        columns.push(name);
        kept_indices.push(index);
    }

    let date_index = columns.iter().position(|c| c == "date");
    let gs_index = columns.iter().position(|c| c == "gs");
    if gs_index.is_none() {
        warn!("season {}: no gs column, keeping every row", season_end);
    }

    let mut dated_rows: Vec<(Option<NaiveDate>, Vec<String>)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let is_away = record.get(AWAY_MARKER_COLUMN) == Some("@");
        let mut cells: Vec<String> = kept_indices
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();

        let date = match date_index {
            Some(i) => match NaiveDate::parse_from_str(&cells[i], DATE_FORMAT) {
                Ok(date) => {
                    cells[i] = date.format(DATE_FORMAT).to_string();
                    Some(date)
                }
                Err(_) => {
                    // Repeated header lines land here too
                    warn!("season {}: dropping row with date {:?}", season_end, cells[i]);
                    continue;
                }
            },
            None => None,
        };

        cells.push(is_away.to_string());
        dated_rows.push((date, cells));
    }

    // Stable, so same-day rows keep file order
    dated_rows.sort_by_key(|(date, _)| *date);

    let rows: Vec<Vec<String>> = dated_rows
        .into_iter()
        .map(|(_, cells)| cells)
        // Inactive / DNP games have a text reason instead of a GS value
        .filter(|cells| gs_index.map_or(true, |i| is_numeric(&cells[i])))
        .enumerate()
        .map(|(n, cells)| {
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push((n + 1).to_string());
            row.extend(cells);
            row
        })
        .collect();

    let mut all_columns = Vec::with_capacity(columns.len() + 2);
    all_columns.push("id".to_string());
    all_columns.extend(columns);
    all_columns.push("is_away".to_string());

    Ok(GameLogTable {
        season_start: season_end - 1,
        season_end,
        columns: all_columns,
        rows,
    })
}

impl GameLogTable {
    pub fn table_name(&self) -> String {
        format!("game_logs_{}_{}", self.season_start, self.season_end)
    }

    pub fn column_types(&self) -> Vec<SqlType> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let values: Vec<&str> = self.rows.iter().map(|row| row[i].as_str()).collect();
                infer_sql_type(column, &values)
            })
            .collect()
    }

    pub fn create_table_sql(&self) -> String {
        let definitions: Vec<String> = self
            .columns
            .iter()
            .zip(self.column_types())
            .map(|(column, sql_type)| {
                if column == "id" {
                    "    id integer primary key".to_string()
                } else {
                    format!("    {} {}", column, sql_type.as_str())
                }
            })
            .collect();

        format!(
            "-- {}-{} Season\ncreate table {} (\n{}\n);\n\n",
            self.season_start,
            self.season_end,
            self.table_name(),
            definitions.join(",\n")
        )
    }

    pub fn write_csv<W: Write>(&self, wtr: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(wtr);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Concatenate the `create table` statements for every season
pub fn render_sql(tables: &[GameLogTable]) -> String {
    let mut sql = String::from("-- Game Logs Tables\n\n");
    for table in tables {
        sql.push_str(&table.create_table_sql());
    }
    sql
}
