// Domain module: scheduling data model, MILP container, solver contract

pub mod keys;
pub mod model;
pub mod parameters;
pub mod solver_adapter;
pub mod value_objects;

pub use keys::*;
pub use model::*;
pub use parameters::*;
pub use solver_adapter::*;
pub use value_objects::*;
