pub mod binning;
pub mod mapper;
pub mod primitives;
pub mod series;
pub mod store;
pub mod types;
pub mod viewport_state;
pub mod windowing;

pub use binning::{BinStrategy, bin_by_time};
pub use mapper::ViewportMapper;
pub use series::Series;
pub use store::{SeriesChange, TimeSeriesStore};
pub use types::{Sample, ScreenRect, TimeRange, ValueRange};
pub use viewport_state::ViewportState;
pub use windowing::samples_in_time_window;
