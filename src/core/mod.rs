pub mod data_window;
pub mod point_scale;
pub mod scale;
pub mod tick_step;
pub mod types;

pub use data_window::{
    AlignKind, DataIndex, IndexFormatterFn, IndexRange, IndexRequest, WindowPolicy, align_index,
    normalize, slice_window,
};
pub use point_scale::PointScale;
pub use scale::LinearScale;
pub use tick_step::{domain_by_step, get_tick_step, linear_ticks, tick_increment};
pub use types::{Dataset, Datum, ReferencePolicy, Series, Viewport, XValue};
