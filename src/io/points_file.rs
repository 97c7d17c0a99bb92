use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Date range a point file suggests showing first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A named list of points as stored in a `.json` point file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SuggestedRange>,
    pub points: Vec<Point>,
}

impl PointSet {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            range: None,
            points,
        }
    }
}

/// Save a point set to a JSON file.
pub fn save_points(set: &PointSet, path: &Path) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(set)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a point set from a JSON file. A bare array of points is accepted too.
pub fn load_points(path: &Path) -> crate::Result<PointSet> {
    let json = std::fs::read_to_string(path)?;
    parse_points(&json, path)
}

fn parse_points(json: &str, path: &Path) -> crate::Result<PointSet> {
    match serde_json::from_str::<PointSet>(json) {
        Ok(set) => Ok(set),
        Err(set_err) => match serde_json::from_str::<Vec<Point>>(json) {
            Ok(points) => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(PointSet::new(name, points))
            }
            Err(_) => Err(set_err.into()),
        },
    }
}
