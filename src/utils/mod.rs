// Utils compartidos

pub mod countdown;

pub use countdown::*;
