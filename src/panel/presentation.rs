//! Panel presentation
//!
//! Each panel kind maps to one presenter through a closed `match`. The
//! renderer owns the fetch lifecycle; presenters only turn loaded series
//! into lines of output.

use crate::api::models::{Panel, PanelKind, SeriesModel, SeriesResponse};
use crate::router::LoadError;

/// What a presenter is handed on each render
pub struct PanelInput<'a> {
    pub data: Option<&'a SeriesResponse>,
    pub error: Option<&'a LoadError>,
    pub loading: bool,
}

pub trait PanelPresenter: Send + Sync {
    fn present(&self, panel: &Panel, series: &SeriesResponse) -> Vec<String>;
}

pub fn presenter_for(kind: PanelKind) -> &'static dyn PanelPresenter {
    match kind {
        PanelKind::Counter => &CounterPresenter,
        PanelKind::Line => &LinePresenter,
        PanelKind::Bar => &BarPresenter,
        PanelKind::Pie => &PiePresenter,
        PanelKind::Text => &TextPresenter,
        PanelKind::Unsupported => &UnsupportedPresenter,
    }
}

/// Format a value the way the backend spells non-finite numbers
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Legend of a series, from the panel's series reference at `filter_index`
fn legend(panel: &Panel, series: &SeriesModel) -> String {
    panel
        .values
        .get(series.filter_index)
        .map(|r| r.legend.clone().unwrap_or_else(|| r.metric.clone()))
        .unwrap_or_else(|| format!("series {}", series.filter_index))
}

/// Min and max over the comparable values; `NaN` when there are none
fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
        .unwrap_or((f64::NAN, f64::NAN))
}

fn no_data(series: &SeriesResponse) -> Option<Vec<String>> {
    series
        .series
        .iter()
        .all(|s| s.values.is_empty())
        .then(|| vec!["no data".to_string()])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregation {
    Last,
    Sum,
    Avg,
}

impl Aggregation {
    fn from_panel(panel: &Panel) -> Self {
        match panel
            .plot_params
            .extra
            .get("aggregation")
            .and_then(|v| v.as_str())
        {
            Some("sum") => Aggregation::Sum,
            Some("avg") => Aggregation::Avg,
            _ => Aggregation::Last,
        }
    }

    fn apply(self, values: &[f64]) -> Option<f64> {
        let last = *values.last()?;
        Some(match self {
            Aggregation::Last => last,
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Avg => values.iter().sum::<f64>() / values.len() as f64,
        })
    }
}

struct CounterPresenter;

impl PanelPresenter for CounterPresenter {
    fn present(&self, panel: &Panel, series: &SeriesResponse) -> Vec<String> {
        if let Some(lines) = no_data(series) {
            return lines;
        }
        let aggregation = Aggregation::from_panel(panel);
        series
            .series
            .iter()
            .filter_map(|s| {
                aggregation
                    .apply(&s.values)
                    .map(|v| format!("{}: {}", legend(panel, s), format_value(v)))
            })
            .collect()
    }
}

struct LinePresenter;

impl PanelPresenter for LinePresenter {
    fn present(&self, panel: &Panel, series: &SeriesResponse) -> Vec<String> {
        if let Some(lines) = no_data(series) {
            return lines;
        }

        let mut lines: Vec<String> = series
            .series
            .iter()
            .filter_map(|s| {
                let last = *s.values.last()?;
                let (min, max) = bounds(&s.values);
                Some(format!(
                    "{}: {} points, last {}, min {}, max {}",
                    legend(panel, s),
                    s.values.len(),
                    format_value(last),
                    format_value(min),
                    format_value(max)
                ))
            })
            .collect();

        if let (Some(first), Some(last)) = (series.sources.first(), series.sources.last()) {
            lines.push(format!(
                "from {} to {}",
                first.timestamp.format("%Y-%m-%d %H:%M"),
                last.timestamp.format("%Y-%m-%d %H:%M")
            ));
        }
        lines
    }
}

struct BarPresenter;

impl PanelPresenter for BarPresenter {
    fn present(&self, panel: &Panel, series: &SeriesResponse) -> Vec<String> {
        if let Some(lines) = no_data(series) {
            return lines;
        }
        series
            .series
            .iter()
            .filter_map(|s| {
                let last = *s.values.last()?;
                Some(format!(
                    "{}: {} snapshot(s), latest {}",
                    legend(panel, s),
                    s.values.len(),
                    format_value(last)
                ))
            })
            .collect()
    }
}

struct PiePresenter;

impl PanelPresenter for PiePresenter {
    fn present(&self, panel: &Panel, series: &SeriesResponse) -> Vec<String> {
        if let Some(lines) = no_data(series) {
            return lines;
        }

        let slices: Vec<(String, f64)> = series
            .series
            .iter()
            .filter_map(|s| {
                let last = *s.values.last()?;
                Some((legend(panel, s), if last.is_finite() { last } else { 0.0 }))
            })
            .collect();
        let total: f64 = slices.iter().map(|(_, v)| v).sum();

        slices
            .into_iter()
            .map(|(name, value)| {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                format!("{}: {:.1}%", name, share)
            })
            .collect()
    }
}

struct TextPresenter;

impl PanelPresenter for TextPresenter {
    fn present(&self, panel: &Panel, _series: &SeriesResponse) -> Vec<String> {
        panel.subtitle.iter().cloned().collect()
    }
}

struct UnsupportedPresenter;

impl PanelPresenter for UnsupportedPresenter {
    fn present(&self, _panel: &Panel, _series: &SeriesResponse) -> Vec<String> {
        vec!["unsupported panel type".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{PlotParams, SeriesRef, SeriesSource};
    use crate::json::ExtValue;
    use chrono::NaiveDate;

    fn panel(kind: PanelKind) -> Panel {
        let mut drift = SeriesRef::new("drift");
        drift.legend = Some("Drift".to_string());
        Panel {
            id: "p".to_string(),
            title: "Panel".to_string(),
            subtitle: Some("About this panel".to_string()),
            size: Default::default(),
            values: vec![drift, SeriesRef::new("rows")],
            plot_params: PlotParams::new(kind),
        }
    }

    fn response(a: Vec<f64>, b: Vec<f64>) -> SeriesResponse {
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 3, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        };
        SeriesResponse {
            sources: vec![
                SeriesSource {
                    snapshot_id: "s1".to_string(),
                    timestamp: day(1),
                },
                SeriesSource {
                    snapshot_id: "s2".to_string(),
                    timestamp: day(2),
                },
            ],
            series: vec![
                SeriesModel {
                    metric_type: "drift".to_string(),
                    filter_index: 0,
                    params: Default::default(),
                    values: a,
                },
                SeriesModel {
                    metric_type: "rows".to_string(),
                    filter_index: 1,
                    params: Default::default(),
                    values: b,
                },
            ],
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.12345), "0.1235");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_counter_aggregation() {
        let mut counter = panel(PanelKind::Counter);
        let data = response(vec![1.0, 2.0, 6.0], vec![]);
        assert_eq!(
            presenter_for(counter.kind()).present(&counter, &data),
            vec!["Drift: 6"]
        );

        counter.plot_params.extra.insert(
            "aggregation".to_string(),
            ExtValue::String("avg".to_string()),
        );
        assert_eq!(
            presenter_for(counter.kind()).present(&counter, &data),
            vec!["Drift: 3"]
        );
    }

    #[test]
    fn test_line_summary_with_non_finite() {
        let line = panel(PanelKind::Line);
        let lines = presenter_for(line.kind()).present(
            &line,
            &response(vec![0.5, f64::INFINITY], vec![10.0, 12.0]),
        );
        assert_eq!(
            lines,
            vec![
                "Drift: 2 points, last Infinity, min 0.5, max Infinity",
                "rows: 2 points, last 12, min 10, max 12",
                "from 2024-03-01 12:00 to 2024-03-02 12:00",
            ]
        );
    }

    #[test]
    fn test_line_bounds_skip_nan() {
        let line = panel(PanelKind::Line);
        let lines = presenter_for(line.kind()).present(
            &line,
            &response(vec![f64::NAN, f64::NAN], vec![f64::NAN, 4.0, 2.0]),
        );
        assert_eq!(lines[0], "Drift: 2 points, last NaN, min NaN, max NaN");
        assert_eq!(lines[1], "rows: 3 points, last 2, min 2, max 4");
    }

    #[test]
    fn test_pie_shares() {
        let pie = panel(PanelKind::Pie);
        let lines = presenter_for(pie.kind()).present(&pie, &response(vec![1.0], vec![3.0]));
        assert_eq!(lines, vec!["Drift: 25.0%", "rows: 75.0%"]);
    }

    #[test]
    fn test_empty_series_and_other_kinds() {
        let bar = panel(PanelKind::Bar);
        assert_eq!(
            presenter_for(bar.kind()).present(&bar, &SeriesResponse::default()),
            vec!["no data"]
        );

        let text = panel(PanelKind::Text);
        assert_eq!(
            presenter_for(text.kind()).present(&text, &SeriesResponse::default()),
            vec!["About this panel"]
        );

        let other = panel(PanelKind::Unsupported);
        assert_eq!(
            presenter_for(other.kind()).present(&other, &SeriesResponse::default()),
            vec!["unsupported panel type"]
        );
    }
}
