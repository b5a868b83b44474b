pub mod bounding;
pub mod calibrate;
pub mod plating;
pub mod volume;
