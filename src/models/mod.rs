pub mod metrics;
pub mod tier;
pub mod badge;
pub mod role;
pub mod error;

pub use metrics::*;
pub use tier::*;
pub use badge::*;
pub use role::*;
pub use error::*;
