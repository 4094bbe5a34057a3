use super::stream::ParsedStream;
use crate::model::Category;
use crate::template::ChartTemplate;
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// Change from baseline, in percent.
    pub value: f64,
}

/// One chart's values, labelled with the column they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedSeries {
    pub category: Category,
    pub points: Vec<SeriesPoint>,
}

impl CalibratedSeries {
    pub fn empty(category: Category) -> Self {
        CalibratedSeries {
            category,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub series: CalibratedSeries,
    /// The axis height was zero, so values are raw offsets from the baseline.
    pub degenerate_axis: bool,
}

/// Convert parsed chart vertices into dated percentage values.
///
/// Every chart spans `template.axis_max_percent` between the drawing origin
/// and the zero line, so a vertex `y` units above the zero line reads
/// `y * axis_max_percent / axis_height` percent. Dates count whole days from
/// `template.epoch`, rounding half to even.
pub fn extract_graph(
    parsed: &ParsedStream,
    category: Category,
    template: &ChartTemplate,
) -> Calibration {
    if parsed.is_empty() || parsed.day_width <= 0.0 {
        return Calibration {
            series: CalibratedSeries::empty(category),
            degenerate_axis: false,
        };
    }

    let scale = template.axis_max_percent / parsed.axis_height;
    let degenerate_axis = !scale.is_finite();
    let scale = if degenerate_axis { 1.0 } else { scale };

    let points = parsed
        .points
        .iter()
        .filter_map(|p| {
            let offset = (p.x / parsed.day_width).round_ties_even();
            let date = day_after(template.epoch, offset)?;
            Some(SeriesPoint {
                date,
                value: p.y * scale,
            })
        })
        .collect();

    Calibration {
        series: CalibratedSeries { category, points },
        degenerate_axis,
    }
}

fn day_after(epoch: NaiveDate, offset: f64) -> Option<NaiveDate> {
    if !offset.is_finite() {
        return None;
    }
    let days = TimeDelta::try_days(offset as i64)?;
    epoch.checked_add_signed(days)
}
