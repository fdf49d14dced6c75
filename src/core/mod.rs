pub mod config;
pub mod constants;
pub mod example;
pub mod label_space;
pub mod output;
pub mod session;
