pub mod aggregator;
pub mod calculators;
pub mod dashboard_service;
pub mod finance_service;
pub mod progress;
pub mod project_service;
pub mod report;
