pub mod dashboard;
pub mod history;
