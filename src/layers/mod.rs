pub mod dense;

pub use dense::{forward, BatchActivations, SampleActivations};
