pub mod bean;
pub mod qualifier;
pub mod registration;
pub mod scope;
pub mod types;
pub mod util;

pub use bean::*;
pub use qualifier::*;
pub use registration::*;
pub use scope::*;
pub use types::*;
