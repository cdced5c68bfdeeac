pub mod control;
pub mod patch;
pub mod technician;
pub mod timestamp;

pub use control::{Company, Control, ControlDraft, ControlStatus, PriorityLevel};
pub use patch::{ControlPatch, DateInput};
pub use technician::{Technician, TechnicianDraft};
