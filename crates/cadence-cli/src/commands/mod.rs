pub mod config;
pub mod console;
pub mod helpers;
pub mod plan;
pub mod run;
