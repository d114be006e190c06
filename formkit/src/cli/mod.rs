mod parser;
mod render;
mod subcommands;

pub use parser::run_cli;
