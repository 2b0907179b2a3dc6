pub mod query;
pub mod record;
pub mod status;
