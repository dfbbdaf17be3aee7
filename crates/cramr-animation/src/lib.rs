//! Spring animation primitives for Cramr.
//!
//! The animator is a plain state object: the host's render loop calls
//! [`SpringAnimation::tick`] once per frame until the returned frame reports
//! it has settled.

mod spring;

pub use spring::{SpringAnimation, SpringFrame, SpringSpec};
