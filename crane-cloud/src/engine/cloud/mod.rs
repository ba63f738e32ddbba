pub mod colour;
pub mod hover;
pub mod picking;
pub mod sampler;
