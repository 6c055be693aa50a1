pub mod column_resolver;
pub use column_resolver::*;

pub mod wildcard_resolver;
pub use wildcard_resolver::*;

pub mod aggregate_resolver;
pub use aggregate_resolver::*;

pub mod sub_query_resolver;
pub use sub_query_resolver::*;
