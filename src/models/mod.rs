pub mod actor;
pub mod message;
pub mod order;
pub mod profile;
pub mod search;
pub mod validation;

pub use actor::*;
pub use message::*;
pub use order::*;
pub use profile::*;
pub use search::*;
pub use validation::*;
