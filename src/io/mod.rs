pub mod csv_import;
pub mod persistence;
pub mod points_file;

pub use csv_import::import_csv;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, RangePersistence, RangeSnapshot};
pub use points_file::{load_points, save_points, PointSet, SuggestedRange};
