pub mod controller;
pub mod runtime;

pub use controller::{Command, Intent, PageController, PageView, RequestId, Response};
pub use runtime::{spawn_page, PageHandle};
