pub mod content_policy;
pub mod runtime;
pub mod sections;
