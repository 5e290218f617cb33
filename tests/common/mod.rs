pub mod faulty_store;
pub mod fixtures;
pub mod strategies;

pub use faulty_store::*;
pub use fixtures::*;
pub use strategies::*;
