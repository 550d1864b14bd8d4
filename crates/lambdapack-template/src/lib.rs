//! SAM template handling for lambdapack
//!
//! Loads a deployment template, tolerating intrinsic-function tags, and
//! resolves each `AWS::Serverless::Function` into a [`ResolvedUnit`] with its
//! source directory and handler module path.

pub mod errors;
pub mod loader;
pub mod property;
pub mod units;

pub use errors::TemplateError;
pub use loader::{parse_document, Template};
pub use property::Property;
pub use units::{resolve, ResolvedUnit, FUNCTION_RESOURCE_TYPE};
