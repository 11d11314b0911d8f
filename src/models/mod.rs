pub mod period;
pub mod response;
pub mod stock;

pub use period::*;
pub use response::*;
pub use stock::*;
