mod diagnostic;
mod error;
mod id;

pub use diagnostic::{Diagnostic, Severity};
pub use error::MasonError;
pub use id::ObjectId;
