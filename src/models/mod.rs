pub mod analysis;
pub mod owner;
pub mod video;
