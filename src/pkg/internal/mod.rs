pub mod adaptors;
pub mod error;
pub mod jobs;
pub mod sql;
