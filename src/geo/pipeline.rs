use super::cluster::{layer_for, FilterState, Layer};
use super::grouping::{group, Grouping};
use super::offset::{OffsetPoint, OffsetResolver};
use crate::config::Settings;
use crate::model::timeframe::filter_points;
use crate::model::{Category, Point, TimeWindow};

/// What the renderer receives: close groups, the remaining points, and
/// whether those remaining points should be clustered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPartition {
    pub close_groups: Vec<Vec<Point>>,
    pub normal_points: Vec<Point>,
    pub cluster_normal: bool,
    /// Locations that were nudged off a project.
    pub offsets_applied: usize,
    filters: FilterState,
}

/// A point with its render layer, as listed by [`RenderPartition::placements`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint<'a> {
    pub point: &'a Point,
    pub layer: Layer,
    /// Index into `close_groups` for close points.
    pub close_group: Option<usize>,
}

impl RenderPartition {
    pub fn empty(filters: FilterState) -> Self {
        Self {
            close_groups: Vec::new(),
            normal_points: Vec::new(),
            cluster_normal: filters.cluster_normal(),
            offsets_applied: 0,
            filters,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.close_groups.iter().map(Vec::len).sum::<usize>() + self.normal_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every point with the layer it belongs in.
    pub fn placements(&self) -> Vec<PlacedPoint<'_>> {
        let close = self.close_groups.iter().enumerate().flat_map(|(index, members)| {
            members.iter().map(move |point| PlacedPoint {
                point,
                layer: layer_for(point.category, true, &self.filters),
                close_group: Some(index),
            })
        });
        let normal = self.normal_points.iter().map(|point| PlacedPoint {
            point,
            layer: layer_for(point.category, false, &self.filters),
            close_group: None,
        });
        close.chain(normal).collect()
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.close_groups
            .iter()
            .flatten()
            .chain(&self.normal_points)
            .filter(|p| p.category == category)
            .count()
    }
}

/// Timeframe filter, grouping, offsets and cluster policy in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPipeline {
    pub close_threshold_km: f64,
    pub resolver: OffsetResolver,
}

impl Default for MarkerPipeline {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl MarkerPipeline {
    pub fn new(settings: &Settings) -> Self {
        Self {
            close_threshold_km: settings.close_threshold_km,
            resolver: OffsetResolver::from_settings(settings),
        }
    }

    /// Build the render partition for `points`.
    ///
    /// Hidden categories contribute nothing. `window`, when given, drops
    /// projects outside the selected dates. Pure: the same input always gives
    /// the same partition.
    pub fn run(&self, points: &[Point], window: Option<&TimeWindow>, filters: &FilterState) -> RenderPartition {
        let visible = match window {
            Some(window) => filter_points(points, window),
            None => points.to_vec(),
        };
        let (projects, locations): (Vec<Point>, Vec<Point>) = visible
            .into_iter()
            .filter(|p| filters.is_shown(p.category))
            .partition(|p| p.category == Category::Project);

        let project_groups = group(&projects, self.close_threshold_km);
        let location_groups = group(&locations, self.close_threshold_km);

        let offsets = self.resolver.apply_offsets(
            &location_groups.flagged(),
            &project_groups.flagged(),
            filters.both_shown(),
        );
        let offsets_applied = offsets.iter().filter(|o| o.applied).count();
        let location_groups = regroup_displaced(&location_groups, &offsets);

        let mut partition = RenderPartition::empty(*filters);
        partition.close_groups = project_groups.close;
        partition.close_groups.extend(location_groups.close);
        partition.normal_points = project_groups.isolated;
        partition.normal_points.extend(location_groups.isolated);
        partition.offsets_applied = offsets_applied;
        partition
    }
}

/// Rebuild `grouping` with each point replaced by its displaced copy.
/// `offsets` follows the order of [`Grouping::flagged`].
fn regroup_displaced(grouping: &Grouping, offsets: &[OffsetPoint]) -> Grouping {
    let mut displaced = offsets.iter().map(OffsetPoint::displaced);
    let close = grouping
        .close
        .iter()
        .map(|members| displaced.by_ref().take(members.len()).collect())
        .collect();
    let isolated = displaced.collect();
    Grouping { close, isolated }
}
