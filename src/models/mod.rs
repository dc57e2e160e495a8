pub mod enums;
pub mod filters;
pub mod specialist;

pub use enums::*;
pub use filters::*;
pub use specialist::*;
