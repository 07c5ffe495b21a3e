// Domain layer - datapoint model and reduction pipeline
pub mod error;
pub mod frame;
pub mod reduction;
pub mod series;
pub mod value;
