//! Cross-component tests for the FAQ assistant.

pub(crate) mod support;
