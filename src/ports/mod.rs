//! Port traits for the collaborators the pipeline talks to.

pub mod config_port;
pub mod data_port;
pub mod notify_port;
pub mod report_port;
