pub mod diagnosis;
pub mod doctor;
pub mod enums;
pub mod patient;

pub use diagnosis::*;
pub use doctor::*;
pub use enums::*;
pub use patient::*;
