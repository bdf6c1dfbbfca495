// HTTP handlers grouped by resource

pub mod auth;
pub mod navigation;
pub mod reports;
pub mod sales_targets;
