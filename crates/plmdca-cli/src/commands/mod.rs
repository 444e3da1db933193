pub mod score;
pub mod shape;
