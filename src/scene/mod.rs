pub mod curve;
pub mod palette;
pub mod population;
