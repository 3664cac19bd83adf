mod combiner;
mod delay;
mod lowpass;
mod mixer;

pub use combiner::*;
pub use delay::*;
pub use lowpass::*;
pub use mixer::*;
