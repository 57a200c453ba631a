//! Conversation relay and transcript reads.

pub mod history;
pub mod relay;

#[cfg(test)]
pub(crate) mod test_support;
