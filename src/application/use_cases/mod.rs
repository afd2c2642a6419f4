pub mod batch_operation;
pub mod exec_command;
pub mod health_check;
pub mod init_project;
pub mod status_check;
