// Resume schema: validation oracle and user input parsing.

pub mod input;
pub mod validation;

pub use input::parse_resume_input;
pub use validation::{ResumeSchemaValidator, SchemaValidator, ValidationReport};
