pub mod page;
pub mod ws;
