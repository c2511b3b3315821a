mod console;
mod root;
mod sample;

pub use root::Cli;
