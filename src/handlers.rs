pub mod auth;
pub mod funnel;
pub mod goals;
pub mod closers;
pub mod permissions;
pub mod ads;
