pub mod school;
/// Demo data set for the interactive session.
pub mod seed;

pub use school::{AuthError, School, SchoolProfile};
