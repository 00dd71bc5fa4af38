pub mod browser;
pub(crate) mod command_adapter;
pub mod command_runner;
pub mod config;
pub mod doctor;
pub mod github;
pub mod graph;
pub mod hosting;
pub mod jj;
pub mod model;
pub mod names;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tickets;
pub mod time;
pub mod vcs;
