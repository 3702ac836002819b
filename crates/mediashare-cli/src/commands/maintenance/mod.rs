pub mod check;
pub mod reap;
pub mod reaper;

pub use check::handle_check;
pub use reap::handle_reap;
pub use reaper::handle_reaper;
