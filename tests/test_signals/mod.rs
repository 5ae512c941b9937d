pub mod reference;

#[allow(unused_imports)]
pub use reference::{direct_convolution, random_stream, sliding_window};
