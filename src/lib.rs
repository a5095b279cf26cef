pub mod archive;
pub mod cli;
pub mod command;
pub mod load_config;
pub mod project;
pub mod publish;
pub mod upload;
