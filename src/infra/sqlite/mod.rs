pub mod bindings;
pub mod queries;
pub mod schema;
pub mod sources;
