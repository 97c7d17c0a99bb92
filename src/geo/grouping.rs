use super::distance::distance_km;
use crate::model::Point;

/// A point tagged with whether grouping placed it in a close group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedPoint {
    pub point: Point,
    pub is_close: bool,
}

/// Result of [`group`]: close groups plus the points with no neighbour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub close: Vec<Vec<Point>>,
    pub isolated: Vec<Point>,
}

impl Grouping {
    /// Number of points across close groups and isolated points.
    pub fn len(&self) -> usize {
        self.close.iter().map(Vec::len).sum::<usize>() + self.isolated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat list in close-groups-then-isolated order with close flags.
    pub fn flagged(&self) -> Vec<GroupedPoint> {
        let close = self.close.iter().flatten().map(|p| GroupedPoint {
            point: p.clone(),
            is_close: true,
        });
        let isolated = self.isolated.iter().map(|p| GroupedPoint {
            point: p.clone(),
            is_close: false,
        });
        close.chain(isolated).collect()
    }
}

/// Partition `points` into close groups and isolated points.
///
/// Points with invalid coordinates are dropped first. The scan is a single
/// flat pass: each unprocessed point claims every still-unprocessed point
/// within `threshold_km` of itself, and claimed points are not expanded
/// further. This is not a connected-component clustering; a chain of points
/// each within reach of the next may split across groups depending on order.
///
/// If the output does not account for every valid input exactly once, the
/// error is logged and the valid input is returned ungrouped.
pub fn group(points: &[Point], threshold_km: f64) -> Grouping {
    let valid: Vec<&Point> = points.iter().filter(|p| p.has_valid_coordinates()).collect();
    let mut processed = vec![false; valid.len()];
    let mut close = Vec::new();

    for i in 0..valid.len() {
        if processed[i] {
            continue;
        }
        let current = valid[i].coord();
        let neighbours: Vec<usize> = (0..valid.len())
            .filter(|&j| j != i && !processed[j])
            .filter(|&j| distance_km(current, valid[j].coord()) <= threshold_km)
            .collect();
        if neighbours.is_empty() {
            continue;
        }

        processed[i] = true;
        let mut members = vec![valid[i].clone()];
        for j in neighbours {
            processed[j] = true;
            members.push(valid[j].clone());
        }
        close.push(members);
    }

    let isolated: Vec<Point> = valid
        .iter()
        .zip(&processed)
        .filter(|(_, done)| !**done)
        .map(|(p, _)| (*p).clone())
        .collect();

    let grouping = Grouping { close, isolated };
    if grouping.len() != valid.len() {
        log::error!(
            "Marker count mismatch after grouping: input {}, output {}; rendering ungrouped",
            valid.len(),
            grouping.len()
        );
        return Grouping {
            close: Vec::new(),
            isolated: valid.into_iter().cloned().collect(),
        };
    }
    grouping
}
