pub mod candidates;
pub mod jobs;
pub mod requirements;
