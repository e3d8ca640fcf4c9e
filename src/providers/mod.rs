pub mod ecb;

pub use ecb::EcbProvider;
