pub mod bridge;
pub mod contracts;
pub mod executor;
pub mod request;

pub use bridge::*;
pub use contracts::*;
pub use executor::*;
pub use request::*;
