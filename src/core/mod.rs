pub mod saturation;
pub mod series;
