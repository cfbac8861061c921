pub mod repl;
pub mod run;
