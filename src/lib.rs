pub mod ingest;
pub mod record;
pub mod summary;
pub mod targets;
