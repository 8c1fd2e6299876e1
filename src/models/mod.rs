mod user;
mod forms;
mod label;
mod task;

pub use user::{User, UserProfile};
pub use forms::{
    CreateLabel, CreateTask, LoginForm, SignupForm, UpdateLabel, UpdateTask,
};
pub use label::{Label, LabelPatch};
pub use task::{Priority, Task, TaskPatch, TaskStatus};
