pub mod cli;
pub mod error;
pub mod printer;
pub mod progress_bars;
