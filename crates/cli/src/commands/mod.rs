//! CLI commands for the holder edge scanner.

pub mod scan;

pub use scan::{run_scan, ScanArgs};
