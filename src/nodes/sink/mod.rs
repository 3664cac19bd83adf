mod device_sink;
mod rtrbsink;

pub use device_sink::*;
pub use rtrbsink::*;

#[cfg(feature = "cpal_sink")]
mod cpal_sink;

#[cfg(feature = "cpal_sink")]
pub use cpal_sink::*;
