//! Plotly-compatible figure construction.
//!
//! Figures serialize into the `{data, layout}` shape that a plotly.js
//! `newPlot` call takes directly, so handlers can hand them to the page
//! without any translation layer.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::CountEntry;

/// Styling shared by every chart on the dashboard.
const BACKGROUND: &str = "whitesmoke";
const FONT_FAMILY: &str = "Poppins-Light";

/// Fixed status colors for the pie chart.
const STATUS_COLORS: [(&str, &str); 3] = [
    ("Validated", "green"),
    ("Awaiting evidence", "blue"),
    ("Removed", "#D62728"),
];

/// Statuses outside the fixed map get a neutral color.
const STATUS_COLOR_FALLBACK: &str = "slategrey";

/// One rendered chart: traces plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// A single plotly trace.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar {
        x: Vec<String>,
        y: Vec<usize>,
    },
    Scatter {
        x: Vec<String>,
        y: Vec<usize>,
        mode: String,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<usize>,
        marker: Marker,
        hovertemplate: String,
    },
}

/// Per-trace visual attributes.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    /// Segment colors, aligned with the pie labels.
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Legend placement for the pie chart.
#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub font: Font,
}

impl Layout {
    /// The house style: title, optional axis titles, whitesmoke backgrounds.
    fn styled(title: Option<String>, x_title: Option<&str>, y_title: Option<&str>) -> Self {
        Self {
            title: title.map(|text| Title { text }),
            xaxis: x_title.map(|text| Axis {
                title: Title {
                    text: text.to_string(),
                },
            }),
            yaxis: y_title.map(|text| Axis {
                title: Title {
                    text: text.to_string(),
                },
            }),
            paper_bgcolor: BACKGROUND.to_string(),
            plot_bgcolor: BACKGROUND.to_string(),
            font: Font {
                family: Some(FONT_FAMILY.to_string()),
                size: None,
            },
            legend: None,
        }
    }
}

/// Styled bar chart from a labeled count series.
pub fn bar_chart(entries: &[CountEntry], title: &str, x_title: &str, y_title: &str) -> Figure {
    Figure {
        data: vec![Trace::Bar {
            x: entries.iter().map(|e| e.label.clone()).collect(),
            y: entries.iter().map(|e| e.count).collect(),
        }],
        layout: Layout::styled(Some(title.to_string()), Some(x_title), Some(y_title)),
    }
}

/// Styled line chart from a date series.
pub fn line_chart(
    points: &[(NaiveDate, usize)],
    title: &str,
    x_title: &str,
    y_title: &str,
) -> Figure {
    Figure {
        data: vec![Trace::Scatter {
            x: points
                .iter()
                .map(|(date, _)| date.format("%Y-%m-%d").to_string())
                .collect(),
            y: points.iter().map(|(_, count)| *count).collect(),
            mode: "lines".to_string(),
        }],
        layout: Layout::styled(Some(title.to_string()), Some(x_title), Some(y_title)),
    }
}

/// Status pie with the fixed color mapping.
///
/// Carries no title; the page frames it with its own heading. The legend
/// sits inside the pie area, as the dashboard has always drawn it.
pub fn status_pie(breakdown: &[CountEntry]) -> Figure {
    let labels: Vec<String> = breakdown.iter().map(|e| e.label.clone()).collect();
    let colors = labels
        .iter()
        .map(|label| status_color(label).to_string())
        .collect();
    let mut layout = Layout::styled(None, None, None);
    layout.legend = Some(Legend {
        x: 0.12,
        y: 0.95,
        font: Font {
            family: None,
            size: Some(22),
        },
    });
    Figure {
        data: vec![Trace::Pie {
            labels,
            values: breakdown.iter().map(|e| e.count).collect(),
            marker: Marker { colors },
            hovertemplate: "Status: %{label}<br>Applications: %{value}".to_string(),
        }],
        layout,
    }
}

fn status_color(label: &str) -> &'static str {
    STATUS_COLORS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, color)| *color)
        .unwrap_or(STATUS_COLOR_FALLBACK)
}
