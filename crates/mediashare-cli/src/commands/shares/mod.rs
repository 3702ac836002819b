pub mod create;
pub mod delete;
pub mod fetch;
pub mod info;

pub use create::handle_create;
pub use delete::handle_delete;
pub use fetch::handle_fetch;
pub use info::handle_info;
