mod adapter;

pub use adapter::*;
pub use tank_adapter_core::*;
