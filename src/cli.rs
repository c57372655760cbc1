//! Command line interface.

pub mod build;
pub mod run;
pub mod seeding;
pub mod trace;
pub mod utils;
