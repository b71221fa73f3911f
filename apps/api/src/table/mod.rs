// Tabular output: coded-field labels and the ranked projection.
pub mod labels;
pub mod projector;

pub use projector::{project, JobTable};
