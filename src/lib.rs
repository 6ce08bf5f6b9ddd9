pub mod conf;
pub mod core;
pub mod descriptor;
pub mod exec;
pub mod meta;
pub mod model;
pub mod plan;
pub mod read;
pub mod service;

#[cfg(feature = "testutil")]
pub mod testutil;
