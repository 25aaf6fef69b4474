pub mod cli;
pub mod commands;
pub mod render;
pub mod shell;
