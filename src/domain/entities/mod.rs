pub mod operation_results;
pub mod project_config;
pub mod repository_entry;
