// Library exports for sleepdash

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod parser;
pub mod record;
pub mod field;

// Aggregation and layout core
pub mod aggregate;
pub mod hierarchy;
pub mod treemap;
pub mod sunburst;
pub mod series;

// Chart pipelines
pub mod chart;
pub mod config;
pub mod dashboard;

pub use chart::{render_view, ChartOutput};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
pub use parser::{parse_views, ViewState};
