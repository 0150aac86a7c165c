#![forbid(unsafe_code)]

//! Command-line front end for the Weekend Text Editor core.

pub mod cli;
pub mod logging;
pub mod run;
