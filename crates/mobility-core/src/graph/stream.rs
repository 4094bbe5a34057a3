//! Recovers chart vertices from a chart object's content stream.
//!
//! The report generator draws every chart as one path: the x axis from the
//! origin to the last day, then the data line back from the last day to the
//! origin. Only `cm`, `m` and `l` operators matter here.

use serde::{Deserialize, Serialize};

/// Coefficients `a b c d e f` of a `cm` operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [f64; 6]);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Data vertices of one chart in chronological order, with y measured
/// upward from the zero line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedStream {
    pub points: Vec<Point>,
    /// Horizontal distance between consecutive days.
    pub day_width: f64,
    /// Distance from the drawing origin to the zero line.
    pub axis_height: f64,
    pub transform: Option<Transform>,
}

impl ParsedStream {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parse the decoded text of a content stream.
///
/// An object without drawn vertices, or with too few to measure a day,
/// yields an empty result rather than an error.
pub fn parse_stream(stream: &str) -> ParsedStream {
    let mut vertices: Vec<Point> = Vec::new();
    let mut transform = None;

    for line in stream.lines() {
        let line = line.trim_end();
        if line.ends_with(" cm") {
            if let Some(t) = parse_transform(line) {
                transform = Some(t);
            }
        } else if line.ends_with(" rg") {
            continue;
        } else if line.ends_with(" l") || line.ends_with(" m") {
            if let Some(p) = parse_vertex(line) {
                vertices.push(p);
            }
        }
    }

    let Some(first) = vertices.first() else {
        return ParsedStream::default();
    };
    let baseline = first.y;

    // Second half is the data trace drawn right to left; its last vertex
    // closes the path at the origin.
    let half = vertices.len() / 2;
    let trace = &vertices[half..vertices.len() - 1];
    let mut points: Vec<Point> = trace
        .iter()
        .rev()
        .map(|p| Point {
            x: p.x,
            y: baseline - p.y,
        })
        .collect();

    // A null first day is emitted as an extra vertex at the origin.
    if points.first() == Some(&Point { x: 0.0, y: 0.0 }) {
        points.remove(0);
    }

    let day_width = match points.get(1) {
        Some(p) if p.x.is_finite() && p.x > 0.0 => p.x,
        _ => {
            tracing::debug!(
                vertices = vertices.len(),
                "content stream has too few data vertices to measure a day"
            );
            return ParsedStream {
                transform,
                ..ParsedStream::default()
            };
        }
    };

    ParsedStream {
        points,
        day_width,
        axis_height: baseline,
        transform,
    }
}

fn parse_vertex(line: &str) -> Option<Point> {
    let mut tokens = line.split_whitespace();
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    Some(Point { x, y })
}

fn parse_transform(line: &str) -> Option<Transform> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take_while(|t| *t != "cm")
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    let coefficients: [f64; 6] = values.try_into().ok()?;
    Some(Transform(coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis trace over `values.len()` days followed by the reversed data
    /// trace and the closing vertex, as the report generator emits it.
    fn chart_stream(baseline: f64, dx: f64, values: &[f64]) -> String {
        let mut out = String::from("q\n1 0 0 -1 30 400 cm\n0.2 0.4 0.8 rg\n");
        for i in 0..values.len() {
            let op = if i == 0 { "m" } else { "l" };
            out.push_str(&format!("{} {} {}\n", i as f64 * dx, baseline, op));
        }
        for (i, v) in values.iter().enumerate().rev() {
            out.push_str(&format!("{} {} l\n", i as f64 * dx, baseline - v));
        }
        out.push_str(&format!("0 {} l\nS\nQ\n", baseline));
        out
    }

    #[test]
    fn test_no_vertices_is_empty() {
        let parsed = parse_stream("q\n0.5 0.5 0.5 rg\n0 0 100 50 re\nf\nQ\n");
        assert!(parsed.is_empty());
        assert_eq!(parsed.day_width, 0.0);
        assert_eq!(parsed.axis_height, 0.0);
        assert!(parsed.transform.is_none());
    }

    #[test]
    fn test_empty_text_is_empty() {
        assert_eq!(parse_stream(""), ParsedStream::default());
    }

    #[test]
    fn test_recovers_chronological_points() {
        let parsed = parse_stream(&chart_stream(50.0, 4.0, &[2.0, 10.0, -5.0, 20.0]));
        assert_eq!(parsed.day_width, 4.0);
        assert_eq!(parsed.axis_height, 50.0);
        let xs: Vec<f64> = parsed.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 4.0, 8.0, 12.0]);
        let ys: Vec<f64> = parsed.points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![2.0, 10.0, -5.0, 20.0]);
    }

    #[test]
    fn test_origin_point_is_dropped() {
        let parsed = parse_stream(&chart_stream(50.0, 4.0, &[0.0, 10.0, -5.0, 20.0]));
        assert_eq!(
            parsed.points,
            vec![
                Point { x: 4.0, y: 10.0 },
                Point { x: 8.0, y: -5.0 },
                Point { x: 12.0, y: 20.0 },
            ]
        );
        // Measured from the second remaining vertex.
        assert_eq!(parsed.day_width, 8.0);
    }

    #[test]
    fn test_nonzero_first_day_is_kept() {
        let parsed = parse_stream(&chart_stream(50.0, 4.0, &[3.0, 10.0, -5.0]));
        assert_eq!(parsed.points.len(), 3);
        assert_eq!(parsed.points[0], Point { x: 0.0, y: 3.0 });
        assert_eq!(parsed.day_width, 4.0);
    }

    #[test]
    fn test_keeps_last_transform() {
        let stream = "1 0 0 1 0 0 cm\n2 0 0 2 5 6 cm\n0 10 m\n3 10 l\n6 10 l\n6 8 l\n3 9 l\n0 10 l\n";
        let parsed = parse_stream(stream);
        assert_eq!(
            parsed.transform,
            Some(Transform([2.0, 0.0, 0.0, 2.0, 5.0, 6.0]))
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let stream = "a b c cm\n0 10 m\nfoo 3 l\n3 10 l\n6 10 l\n6 8 l\n3 9 l\n0 10 l\n";
        let parsed = parse_stream(stream);
        assert!(parsed.transform.is_none());
        assert_eq!(parsed.points, vec![Point { x: 3.0, y: 1.0 }, Point { x: 6.0, y: 2.0 }]);
    }

    #[test]
    fn test_single_data_point_is_empty() {
        let parsed = parse_stream("1 0 0 1 0 0 cm\n0 10 m\n5 10 l\n5 8 l\n0 10 l\n");
        assert!(parsed.is_empty());
        assert_eq!(parsed.day_width, 0.0);
        assert!(parsed.transform.is_some());
    }
}
