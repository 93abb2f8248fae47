//! Sub-commands of the `cardrelay` binary.

pub mod compare;
pub mod labels;
pub mod provider;
pub mod serve;
pub mod summary;
pub mod webhook;
