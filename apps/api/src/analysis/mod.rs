//! Scoring, assessment and the HTTP handlers that run the full pipeline.

pub mod assessment;
pub mod handlers;
pub mod scoring;

#[cfg(test)]
mod test_logs;
