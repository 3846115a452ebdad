use crate::chart::{render_view, ChartOutput};
use crate::config::DashboardConfig;
use crate::data::RawTable;
use crate::parser::ast::ViewState;
use crate::record::{normalize_table, SleepRecord};
use log::{debug, warn};
use std::mem;

/// A loaded dataset plus the most recent output of each chart.
///
/// The records never change after construction, so a chart only has to be
/// recomputed when its view state differs from the one it last rendered.
/// Each chart keeps a single slot; a new view state replaces the old one.
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<SleepRecord>,
    config: DashboardConfig,
    rendered: Vec<(ViewState, ChartOutput)>,
}

impl Dashboard {
    pub fn new(records: Vec<SleepRecord>, config: DashboardConfig) -> Self {
        Self {
            records,
            config,
            rendered: Vec::new(),
        }
    }

    pub fn from_table(table: &RawTable, config: DashboardConfig) -> Self {
        let records = normalize_table(table);
        if records.is_empty() {
            warn!("dataset has no rows; charts will be empty");
        }
        Self::new(records, config)
    }

    pub fn records(&self) -> &[SleepRecord] {
        &self.records
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Chart for `view`, reused when it matches that chart's last view.
    pub fn render(&mut self, view: &ViewState) -> &ChartOutput {
        let slot = self
            .rendered
            .iter()
            .position(|(v, _)| mem::discriminant(v) == mem::discriminant(view));

        let idx = match slot {
            Some(idx) if self.rendered[idx].0 == *view => idx,
            _ => {
                debug!("rendering {:?}", view);
                let entry = (view.clone(), render_view(&self.records, view, &self.config));
                match slot {
                    Some(idx) => {
                        self.rendered[idx] = entry;
                        idx
                    }
                    None => {
                        self.rendered.push(entry);
                        self.rendered.len() - 1
                    }
                }
            }
        };
        &self.rendered[idx].1
    }

    pub fn render_all(&mut self, views: &[ViewState]) -> Vec<ChartOutput> {
        views.iter().map(|v| self.render(v).clone()).collect()
    }

    pub fn cached_views(&self) -> usize {
        self.rendered.len()
    }
}
