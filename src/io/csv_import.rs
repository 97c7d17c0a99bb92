use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{Category, Point};

/// Column a header maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Title,
    Lat,
    Lng,
    Category,
    Start,
    End,
}

/// Try parsing a date or date-time string with several common formats.
/// Bare dates are read as midnight.
fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_category(s: &str) -> Option<Category> {
    match s.trim().to_lowercase().as_str() {
        "" | "project" | "projects" | "event" | "events" => Some(Category::Project),
        "location" | "locations" | "place" | "places" | "saved" => Some(Category::Location),
        _ => None,
    }
}

fn parse_coordinate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "key" | "uuid" => Some(Column::Id),
        "title" | "name" | "label" | "event" | "eventname" => Some(Column::Title),
        "lat" | "latitude" | "y" => Some(Column::Lat),
        "lng" | "lon" | "long" | "longitude" | "x" => Some(Column::Lng),
        "category" | "type" | "kind" => Some(Column::Category),
        "start" | "startdate" | "from" | "begin" | "begindate" | "date" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "until" => Some(Column::End),
        _ => None,
    }
}

/// Import points from a CSV file.
///
/// Auto-detects the delimiter (comma, semicolon, tab) and matches headers
/// flexibly ("Latitude", "Start Date", ...). Returns `(points, skipped)`.
pub fn import_csv(path: &Path) -> crate::Result<(Vec<Point>, usize)> {
    let content = std::fs::read_to_string(path)?;
    import_csv_str(&content)
}

/// Same as [`import_csv`] for in-memory content.
pub fn import_csv_str(content: &str) -> crate::Result<(Vec<Point>, usize)> {
    if content.trim().is_empty() {
        return Err(crate::Error::InvalidInput("CSV file is empty".to_string()));
    }
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let has = |col: Column| col_map.contains(&Some(col));
    if !has(Column::Lat) || !has(Column::Lng) {
        return Err(crate::Error::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping CSV row {}: {}", row, e);
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| -> Option<&str> {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
        };

        let (lat, lng) = match (
            field(Column::Lat).and_then(parse_coordinate),
            field(Column::Lng).and_then(parse_coordinate),
        ) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                log::warn!("Skipping CSV row {}: unreadable coordinates", row);
                skipped += 1;
                continue;
            }
        };

        let category = match parse_category(field(Column::Category).unwrap_or("")) {
            Some(c) => c,
            None => {
                log::warn!(
                    "Skipping CSV row {}: unknown category '{}'",
                    row,
                    field(Column::Category).unwrap_or("")
                );
                skipped += 1;
                continue;
            }
        };

        let id = field(Column::Id)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let title = field(Column::Title).unwrap_or_default().to_string();

        let mut point = Point::new(id, lat, lng, category).with_title(title);
        if category == Category::Project {
            point.start_date = field(Column::Start).and_then(parse_date);
            point.end_date = field(Column::End).and_then(parse_date);
        }
        points.push(point);
    }

    if points.is_empty() {
        return Err(crate::Error::NoRows { skipped });
    }
    Ok((points, skipped))
}
