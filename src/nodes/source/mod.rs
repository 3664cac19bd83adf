mod oscillator;
mod sample_source;

pub use oscillator::*;
pub use sample_source::*;
