// Library root for the command-line front end, so config and rendering are
// testable apart from `main`.

pub mod config;
pub mod report;
