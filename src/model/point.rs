use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::Coord;

/// Reserved coordinate value meaning "no position recorded".
pub const UNSET_COORDINATE: f64 = -1.0;

/// Which layer family a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A dated event shared in a circle.
    Project,
    /// A saved place of the user or a friend; undated.
    Location,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Project => "Project",
            Category::Location => "Location",
        }
    }
}

fn unset_coordinate() -> f64 {
    UNSET_COORDINATE
}

/// `null` reads as the unset sentinel so one bad point cannot fail a whole file.
fn coordinate_or_unset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(UNSET_COORDINATE))
}

/// A single map entity as it arrives from the point source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "unset_coordinate", deserialize_with = "coordinate_or_unset")]
    pub lat: f64,
    #[serde(default = "unset_coordinate", deserialize_with = "coordinate_or_unset")]
    pub lng: f64,
    pub category: Category,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
}

impl Point {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64, category: Category) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            lat,
            lng,
            category,
            start_date: None,
            end_date: None,
        }
    }

    pub fn project(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self::new(id, lat, lng, Category::Project)
    }

    pub fn location(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self::new(id, lat, lng, Category::Location)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.lat, self.lng)
    }

    /// Finite and not the reserved "unset" sentinel on either axis.
    pub fn has_valid_coordinates(&self) -> bool {
        self.coord().is_finite() && self.lat != UNSET_COORDINATE && self.lng != UNSET_COORDINATE
    }

    /// Copy of this point moved to `coord`.
    pub fn moved_to(&self, coord: Coord) -> Self {
        Self {
            lat: coord.lat,
            lng: coord.lng,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_non_finite_coordinates_are_invalid() {
        assert!(Point::project("a", 48.0, 2.0).has_valid_coordinates());
        assert!(!Point::project("b", UNSET_COORDINATE, 2.0).has_valid_coordinates());
        assert!(!Point::project("c", 48.0, UNSET_COORDINATE).has_valid_coordinates());
        assert!(!Point::project("d", f64::NAN, 2.0).has_valid_coordinates());
        assert!(!Point::project("e", 48.0, f64::INFINITY).has_valid_coordinates());
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let point: Point =
            serde_json::from_str(r#"{"id":"x","lat":1.5,"lng":2.5,"category":"location"}"#).unwrap();
        assert_eq!(point.category, Category::Location);
        assert!(point.title.is_empty());
        assert!(point.start_date.is_none());
    }

    #[test]
    fn missing_or_null_coordinates_read_as_unset() {
        let point: Point =
            serde_json::from_str(r#"{"id":"x","lat":null,"category":"project"}"#).unwrap();
        assert_eq!(point.lat, UNSET_COORDINATE);
        assert_eq!(point.lng, UNSET_COORDINATE);
        assert!(!point.has_valid_coordinates());
    }

    #[test]
    fn moved_to_leaves_original_untouched() {
        let original = Point::location("x", 1.0, 2.0).with_title("Home");
        let moved = original.moved_to(Coord::new(1.5, 2.5));
        assert_eq!(original.lat, 1.0);
        assert_eq!(moved.lat, 1.5);
        assert_eq!(moved.title, "Home");
    }
}
