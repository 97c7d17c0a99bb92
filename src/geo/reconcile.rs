use std::collections::BTreeMap;

use super::cluster::Layer;
use super::distance::Coord;
use super::pipeline::RenderPartition;
use crate::model::Category;

/// Identity of a rendered marker. Ids are unique per category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerKey {
    pub category: Category,
    pub id: String,
}

/// Where and how one marker is currently drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub layer: Layer,
    pub coord: Coord,
    pub category: Category,
    pub close_group: Option<usize>,
    pub title: String,
}

/// Changes applied by one [`MarkerLayers::reconcile`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerDiff {
    pub added: Vec<MarkerKey>,
    pub removed: Vec<MarkerKey>,
    /// Markers that changed layer, position or group.
    pub moved: Vec<MarkerKey>,
}

impl LayerDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }
}

/// Markers currently on the map, keyed by identity.
///
/// The renderer keeps one of these and feeds it each new partition; markers
/// whose placement is unchanged are left alone.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayers {
    markers: BTreeMap<MarkerKey, Placement>,
}

impl MarkerLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, partition: &RenderPartition) -> LayerDiff {
        let mut next = BTreeMap::new();
        for placed in partition.placements() {
            let key = MarkerKey {
                category: placed.point.category,
                id: placed.point.id.clone(),
            };
            let placement = Placement {
                layer: placed.layer,
                coord: placed.point.coord(),
                category: placed.point.category,
                close_group: placed.close_group,
                title: placed.point.title.clone(),
            };
            if next.insert(key.clone(), placement).is_some() {
                log::warn!("Duplicate marker {:?} {}; keeping the last one", key.category, key.id);
            }
        }

        let mut diff = LayerDiff::default();
        for (key, placement) in &next {
            match self.markers.get(key) {
                None => diff.added.push(key.clone()),
                Some(current) if current != placement => diff.moved.push(key.clone()),
                Some(_) => {}
            }
        }
        diff.removed = self
            .markers
            .keys()
            .filter(|key| !next.contains_key(*key))
            .cloned()
            .collect();

        if !diff.is_empty() {
            log::debug!(
                "Markers reconciled: +{} -{} ~{}",
                diff.added.len(),
                diff.removed.len(),
                diff.moved.len()
            );
        }
        self.markers = next;
        diff
    }

    pub fn get(&self, key: &MarkerKey) -> Option<&Placement> {
        self.markers.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MarkerKey, &Placement)> {
        self.markers.iter()
    }

    pub fn in_layer(&self, layer: Layer) -> impl Iterator<Item = (&MarkerKey, &Placement)> {
        self.markers.iter().filter(move |(_, p)| p.layer == layer)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
