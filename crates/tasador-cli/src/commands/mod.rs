//! Command implementations

pub(crate) mod batch;
pub(crate) mod labels;
pub(crate) mod predict;
