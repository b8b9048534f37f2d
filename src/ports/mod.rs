//! Trait boundaries between the batch runner and its consumers

pub mod observer;

pub use observer::Observer;
