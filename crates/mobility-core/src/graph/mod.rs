pub mod calibrate;
pub mod stream;

pub use calibrate::{extract_graph, CalibratedSeries, Calibration, SeriesPoint};
pub use stream::{parse_stream, ParsedStream, Point, Transform};
