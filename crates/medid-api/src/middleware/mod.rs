//! HTTP middleware. Authentication lives in [`crate::auth`].

pub mod metrics;
