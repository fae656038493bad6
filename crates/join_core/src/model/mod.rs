mod category;
mod contact;
mod task;

pub use category::{CATEGORY_PLACEHOLDER, Category};
pub use contact::{CONTACT_PALETTE, Contact};
pub use task::{Priority, Progress, Subtask, Task};
