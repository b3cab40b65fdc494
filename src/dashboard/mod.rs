pub mod service;

pub use service::{
    DashboardError, DashboardRequest, DashboardResponse, DashboardService, MergeOutcome,
};
