// Chart pipelines: (records, view state) -> render-ready data

use crate::aggregate::{occupation_stats, quality_breakdown, QualityBucket};
use crate::config::DashboardConfig;
use crate::hierarchy::{bmi_disorder_hierarchy, from_occupations};
use crate::parser::ast::{SunburstView, TreemapView, ViewState};
use crate::record::{SleepDisorder, SleepRecord};
use crate::series::{build_series, Series, SeriesMode};
use crate::sunburst::{self, ArcNode};
use crate::treemap::{self, label_visibility, LabelVisibility, Rect, TreemapNode, TreemapOptions};
use log::debug;
use serde::Serialize;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartOutput {
    QualityBars(QualityChart),
    StressLines(StressChart),
    OccupationTreemap(TreemapChart),
    BmiSunburst(SunburstChart),
}

// =============================================================================
// Quality of sleep: stacked bars + duration line
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityChart {
    pub buckets: Vec<QualityBucket>,
    pub stacks: Vec<StackLayer>,
    /// Present only when the line is switched on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_line: Option<Vec<DurationPoint>>,
    pub max_total: usize,
    pub max_avg_duration: Option<f64>,
}

/// One disorder's band across all quality buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackLayer {
    pub disorder: String,
    pub segments: Vec<StackSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackSegment {
    pub quality: u8,
    pub y0: usize,
    pub y1: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationPoint {
    pub quality: u8,
    pub avg_duration: f64,
}

/// Cumulative bar segments, stacked None, then Insomnia, then Sleep Apnea.
pub fn stack_breakdown(buckets: &[QualityBucket]) -> Vec<StackLayer> {
    let mut baseline = vec![0usize; buckets.len()];

    SleepDisorder::CHARTED
        .iter()
        .map(|disorder| {
            let segments = buckets
                .iter()
                .zip(baseline.iter_mut())
                .map(|(bucket, base)| {
                    let y0 = *base;
                    *base += bucket.count_for(disorder);
                    StackSegment {
                        quality: bucket.quality,
                        y0,
                        y1: *base,
                    }
                })
                .collect();

            StackLayer {
                disorder: disorder.label().to_string(),
                segments,
            }
        })
        .collect()
}

pub fn quality_chart(records: &[SleepRecord], show_line: bool, domain: RangeInclusive<u8>) -> QualityChart {
    let buckets = quality_breakdown(records, domain);
    let stacks = stack_breakdown(&buckets);

    // Buckets without a mean are gaps in the line, not zeros
    let line: Vec<DurationPoint> = buckets
        .iter()
        .filter_map(|b| {
            Some(DurationPoint {
                quality: b.quality,
                avg_duration: b.avg_duration?,
            })
        })
        .collect();

    let max_total = buckets.iter().map(QualityBucket::total).max().unwrap_or(0);
    let max_avg_duration = line.iter().map(|p| p.avg_duration).reduce(f64::max);

    QualityChart {
        buckets,
        stacks,
        duration_line: show_line.then_some(line),
        max_total,
        max_avg_duration,
    }
}

// =============================================================================
// Stress vs. sleep duration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressChart {
    pub mode: SeriesMode,
    pub series: Vec<Series>,
}

pub fn stress_chart(records: &[SleepRecord], mode: SeriesMode, domain: RangeInclusive<u8>) -> StressChart {
    StressChart {
        mode,
        series: build_series(records, mode, domain),
    }
}

// =============================================================================
// Occupation treemap
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapChart {
    pub min_sample: usize,
    pub root: TreemapNode,
    /// Leaf rectangles, largest first
    pub cells: Vec<TreemapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapCell {
    pub name: String,
    pub count: usize,
    #[serde(flatten)]
    pub rect: Rect,
    pub avg_quality: Option<f64>,
    pub avg_stress: Option<f64>,
    pub labels: LabelVisibility,
}

/// A view's size override, if it is one the layout can honor.
fn size_override(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn treemap_chart(records: &[SleepRecord], view: &TreemapView, config: &DashboardConfig) -> TreemapChart {
    let stats = occupation_stats(records);
    let tree = from_occupations(&stats, view.min_sample);
    debug!(
        "treemap keeps {} of {} occupations (min_sample {})",
        tree.children.len(),
        stats.len(),
        view.min_sample
    );

    let options = TreemapOptions {
        width: size_override(view.width).unwrap_or(config.treemap.width),
        height: size_override(view.height).unwrap_or(config.treemap.height),
        ..config.treemap
    };
    let root = treemap::layout(&tree, &options);

    let cells = root
        .children
        .iter()
        .flat_map(TreemapNode::leaves)
        .map(|leaf| TreemapCell {
            name: leaf.name.clone(),
            count: leaf.value as usize,
            rect: leaf.rect,
            avg_quality: leaf.summary.and_then(|s| s.avg_quality),
            avg_stress: leaf.summary.and_then(|s| s.avg_stress),
            labels: label_visibility(&leaf.rect, &config.treemap_labels),
        })
        .collect();

    TreemapChart {
        min_sample: view.min_sample,
        root,
        cells,
    }
}

// =============================================================================
// BMI / disorder sunburst
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstChart {
    pub radius: f64,
    pub root: ArcNode,
    pub labels: Vec<ArcLabel>,
}

/// Placement for an arc label that is long enough to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcLabel {
    pub name: String,
    pub depth: usize,
    /// Mid angle in degrees, clockwise from 12 o'clock
    pub angle: f64,
    /// Mid radius of the ring
    pub radius: f64,
    /// Text on the left half is turned upright
    pub flipped: bool,
}

pub fn sunburst_chart(records: &[SleepRecord], view: &SunburstView, config: &DashboardConfig) -> SunburstChart {
    let tree = bmi_disorder_hierarchy(records);
    let radius = size_override(view.radius).unwrap_or(config.sunburst.radius);
    let root = sunburst::layout(&tree, radius);

    let min_arc = config.sunburst.min_label_arc;
    let labels = root
        .descendants()
        .into_iter()
        .filter(|arc| arc.shows_label(min_arc))
        .map(|arc| {
            let angle = ((arc.x0 + arc.x1) / 2.0).to_degrees();
            ArcLabel {
                name: arc.name.clone(),
                depth: arc.depth,
                angle,
                radius: (arc.y0 + arc.y1) / 2.0,
                flipped: angle >= 180.0,
            }
        })
        .collect();

    SunburstChart { radius, root, labels }
}

/// Compute one chart from scratch.
pub fn render_view(records: &[SleepRecord], view: &ViewState, config: &DashboardConfig) -> ChartOutput {
    match view {
        ViewState::QualityBars(v) => {
            ChartOutput::QualityBars(quality_chart(records, v.show_line, config.score_domain()))
        }
        ViewState::StressLines(v) => {
            ChartOutput::StressLines(stress_chart(records, v.mode, config.score_domain()))
        }
        ViewState::OccupationTreemap(v) => ChartOutput::OccupationTreemap(treemap_chart(records, v, config)),
        ViewState::BmiSunburst(v) => ChartOutput::BmiSunburst(sunburst_chart(records, v, config)),
    }
}
