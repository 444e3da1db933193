pub mod alignment;
pub mod parameters;
pub mod score;
pub mod shape;
