pub mod body_metrics;
pub mod entry_service;
pub mod events;
pub mod insights;
pub mod settings_service;
pub mod stats_service;
