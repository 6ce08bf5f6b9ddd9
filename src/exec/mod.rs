mod executor;

pub use executor::{ClickhouseRunner, Executor, Runner};
