// Abstract Syntax Tree for the view selection DSL

use crate::series::SeriesMode;

/// Immutable snapshot of one chart's UI toggles.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    QualityBars(QualityBarsView),
    StressLines(StressLinesView),
    OccupationTreemap(TreemapView),
    BmiSunburst(SunburstView),
}

impl ViewState {
    /// Every chart with its default toggles, in dashboard order.
    pub fn all() -> Vec<ViewState> {
        vec![
            ViewState::QualityBars(QualityBarsView::default()),
            ViewState::StressLines(StressLinesView::default()),
            ViewState::OccupationTreemap(TreemapView::default()),
            ViewState::BmiSunburst(SunburstView::default()),
        ]
    }
}

/// Stacked disorder bars per sleep-quality score
#[derive(Debug, Clone, PartialEq)]
pub struct QualityBarsView {
    /// Overlay the average sleep duration line
    pub show_line: bool,
}

impl Default for QualityBarsView {
    fn default() -> Self {
        Self { show_line: true }
    }
}

/// Sleep duration by stress level
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StressLinesView {
    pub mode: SeriesMode,
}

/// Occupations sized by headcount
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapView {
    /// Occupations with fewer people are left out
    pub min_sample: usize,
    // Canvas overrides (None = configured size)
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Default for TreemapView {
    fn default() -> Self {
        Self {
            min_sample: 1,
            width: None,
            height: None,
        }
    }
}

/// BMI category and sleep disorder rings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SunburstView {
    pub radius: Option<f64>,
}
