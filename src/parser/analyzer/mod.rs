pub mod resolved_column;
pub use resolved_column::*;

pub mod analyzer_error;
pub use analyzer_error::*;

pub mod analysis_context;
pub use analysis_context::*;

pub mod select_resolver;
pub use select_resolver::*;

pub mod resolvers;
pub use resolvers::*;
