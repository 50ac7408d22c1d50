pub mod context;
pub mod net;
