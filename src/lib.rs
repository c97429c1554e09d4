pub mod calendar;
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod fill;
pub mod git;
pub mod model;
pub mod output;
pub mod plan;
pub mod run;
pub mod sampler;
pub mod settings;
pub mod telemetry;
pub mod util;
