//! Command line surface of evalgen: argument parsing, config assembly and
//! result reporting. The `evalgen` binary wires these to a client.

pub mod options;
pub mod report;
