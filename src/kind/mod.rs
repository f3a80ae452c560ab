/// Adapter around the `kind` command line tool
pub mod client;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use client::KindClient;
pub use runner::{CommandRunner, ProcessRunner};
