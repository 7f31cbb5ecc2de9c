// Adapters layer: concrete implementations of the domain ports.

pub mod model_loader;
pub mod storage;
