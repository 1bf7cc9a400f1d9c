mod status;
mod users;

pub use status::*;
pub use users::*;
