pub mod dashboard;
pub mod layout;
pub mod response;
pub mod stock;

pub use dashboard::*;
pub use layout::*;
pub use response::*;
pub use stock::*;
