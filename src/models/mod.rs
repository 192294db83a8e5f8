pub mod request;
pub mod repository;
pub mod analysis;
pub mod script;
pub mod thumbnail;

pub use request::*;
pub use repository::*;
pub use analysis::*;
pub use script::*;
pub use thumbnail::*;
