pub mod jobs;
pub mod probes;
