pub mod drag;
pub mod interval;
pub mod point;
pub mod throttle;
pub mod timeframe;

pub use drag::{DragMode, DragModeStateMachine, DragSession, DragState, PointerEvent, SliderGeometry};
pub use interval::{Interval, RangeIntervalModel, RangePreset, WeekSpan};
pub use point::{Category, Point, UNSET_COORDINATE};
pub use throttle::Throttle;
pub use timeframe::TimeWindow;
