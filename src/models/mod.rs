pub mod enums;
pub mod events;
pub mod red_flag;
pub mod symptom;

pub use enums::*;
pub use events::*;
pub use red_flag::*;
pub use symptom::*;
