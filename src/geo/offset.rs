use super::distance::Coord;
use super::grouping::GroupedPoint;
use crate::config::Settings;
use crate::model::{Category, Point};

/// A location point with the nudge (if any) that keeps it clear of a project.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPoint {
    /// The point as it came in, original coordinates.
    pub point: Point,
    pub is_close: bool,
    pub d_lat: f64,
    pub d_lng: f64,
    pub applied: bool,
}

impl OffsetPoint {
    fn unchanged(grouped: &GroupedPoint) -> Self {
        Self {
            point: grouped.point.clone(),
            is_close: grouped.is_close,
            d_lat: 0.0,
            d_lng: 0.0,
            applied: false,
        }
    }

    /// Coordinate after the nudge.
    pub fn coord(&self) -> Coord {
        Coord::new(self.point.lat + self.d_lat, self.point.lng + self.d_lng)
    }

    /// Copy of the point at its displayed position.
    pub fn displaced(&self) -> Point {
        if self.applied {
            self.point.moved_to(self.coord())
        } else {
            self.point.clone()
        }
    }
}

/// Nudges location pins off project pins they would sit on top of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetResolver {
    pub coincidence_threshold_deg: f64,
    pub offset_deg: f64,
    pub close_offset_deg: f64,
}

impl Default for OffsetResolver {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl OffsetResolver {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            coincidence_threshold_deg: settings.coincidence_threshold_deg,
            offset_deg: settings.offset_deg,
            close_offset_deg: settings.close_offset_deg,
        }
    }

    /// Offset every location lying within the coincidence threshold (on both
    /// axes) of a project.
    ///
    /// Only the first matching project in scan order decides the nudge. The
    /// larger nudge is used when the location and that project are both in
    /// close groups. With `both_filters_active` false nothing moves.
    pub fn apply_offsets(
        &self,
        locations: &[GroupedPoint],
        projects: &[GroupedPoint],
        both_filters_active: bool,
    ) -> Vec<OffsetPoint> {
        locations
            .iter()
            .map(|location| {
                let mut out = OffsetPoint::unchanged(location);
                if !both_filters_active || location.point.category != Category::Location {
                    return out;
                }
                let Some(project) = self.first_coincident(&location.point, projects) else {
                    return out;
                };
                let amount = if location.is_close && project.is_close {
                    self.close_offset_deg
                } else {
                    self.offset_deg
                };
                out.d_lat = amount;
                out.d_lng = amount;
                out.applied = true;
                out
            })
            .collect()
    }

    fn first_coincident<'a>(&self, location: &Point, projects: &'a [GroupedPoint]) -> Option<&'a GroupedPoint> {
        projects.iter().find(|project| {
            project.point.category == Category::Project
                && project.point.has_valid_coordinates()
                && (location.lat - project.point.lat).abs() < self.coincidence_threshold_deg
                && (location.lng - project.point.lng).abs() < self.coincidence_threshold_deg
        })
    }
}
