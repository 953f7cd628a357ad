pub mod client;
pub mod dashboard;
pub mod finance;
pub mod project;
pub mod staff;
pub mod vehicle;
