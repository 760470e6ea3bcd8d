pub mod atomic;
pub mod map;
pub mod records;

pub use atomic::*;
pub use map::*;
pub use records::*;
