use crate::model::Category;

/// Whether normal (non-close) points go into the cluster layer.
///
/// Mixed-category clustering is never allowed: with both categories shown
/// the answer is always `false`. Otherwise the user's toggle decides. Close
/// groups are clustered regardless.
pub fn should_cluster_normal_points(show_a: bool, show_b: bool, user_cluster_toggle: bool) -> bool {
    if show_a && show_b {
        false
    } else {
        user_cluster_toggle
    }
}

/// Category visibility and the user's clustering toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    show_projects: bool,
    show_locations: bool,
    cluster_toggle: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_projects: true,
            show_locations: true,
            cluster_toggle: false,
        }
    }
}

impl FilterState {
    pub fn new(show_projects: bool, show_locations: bool, cluster_toggle: bool) -> Self {
        let mut state = Self {
            show_projects,
            show_locations,
            cluster_toggle: false,
        };
        state.set_cluster_toggle(cluster_toggle);
        state
    }

    pub fn show_projects(&self) -> bool {
        self.show_projects
    }

    pub fn show_locations(&self) -> bool {
        self.show_locations
    }

    pub fn cluster_toggle(&self) -> bool {
        self.cluster_toggle
    }

    pub fn both_shown(&self) -> bool {
        self.show_projects && self.show_locations
    }

    pub fn is_shown(&self, category: Category) -> bool {
        match category {
            Category::Project => self.show_projects,
            Category::Location => self.show_locations,
        }
    }

    /// The clustering control is disabled while both categories are shown.
    pub fn clustering_available(&self) -> bool {
        !self.both_shown()
    }

    pub fn cluster_normal(&self) -> bool {
        should_cluster_normal_points(self.show_projects, self.show_locations, self.cluster_toggle)
    }

    pub fn set_show_projects(&mut self, show: bool) {
        self.set_visibility(show, self.show_locations);
    }

    pub fn set_show_locations(&mut self, show: bool) {
        self.set_visibility(self.show_projects, show);
    }

    pub fn set_shown(&mut self, category: Category, show: bool) {
        match category {
            Category::Project => self.set_show_projects(show),
            Category::Location => self.set_show_locations(show),
        }
    }

    /// Request the clustering toggle. Returns the resulting value; turning it
    /// on is refused while both categories are shown.
    pub fn set_cluster_toggle(&mut self, on: bool) -> bool {
        self.cluster_toggle = on && self.clustering_available();
        self.cluster_toggle
    }

    /// The toggle is reset whenever both categories end up shown, when the
    /// set shrinks from both to one, or when any category is switched off.
    fn set_visibility(&mut self, show_projects: bool, show_locations: bool) {
        let was_both = self.both_shown();
        let turned_off = (self.show_projects && !show_projects) || (self.show_locations && !show_locations);
        self.show_projects = show_projects;
        self.show_locations = show_locations;

        let now_both = self.both_shown();
        let narrowed = was_both && show_projects != show_locations;
        if now_both || narrowed || turned_off {
            if self.cluster_toggle {
                log::debug!("Clustering reset after filter change");
            }
            self.cluster_toggle = false;
        }
    }
}

/// Where the renderer should draw a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The small cluster layer holding a category's close groups.
    CloseCluster(Category),
    /// A category's main cluster layer.
    MainCluster(Category),
    /// Drawn on its own.
    Individual,
}

/// Layer for a point of `category`. Close points merge into the main cluster
/// only when their category is the only one shown and clustering is on.
pub fn layer_for(category: Category, is_close: bool, filters: &FilterState) -> Layer {
    let cluster_normal = filters.cluster_normal();
    let only_this_shown = filters.is_shown(category) && !filters.both_shown();
    if is_close {
        if only_this_shown && cluster_normal {
            Layer::MainCluster(category)
        } else {
            Layer::CloseCluster(category)
        }
    } else if cluster_normal {
        Layer::MainCluster(category)
    } else {
        Layer::Individual
    }
}
