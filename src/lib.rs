pub mod classifier;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod few_shot;
pub mod io_utils;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod tags;
