//! Cross-crate integration tests for medid. Everything lives under `tests/`.
