pub mod normalize;
pub mod sequence;
pub mod batch;
