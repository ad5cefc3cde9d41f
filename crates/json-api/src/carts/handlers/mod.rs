//! Cart Handlers

pub(crate) mod finished;
