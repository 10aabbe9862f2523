//! Wire and domain types shared between the measurement client and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
