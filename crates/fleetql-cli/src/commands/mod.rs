pub mod ast;
pub mod catalogs;
pub mod check;
pub mod matching;
pub mod print;
pub mod run_common;
pub mod sql;
pub mod suggest;

#[cfg(test)]
mod run_common_tests;
