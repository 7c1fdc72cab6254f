pub mod auth;
pub mod funnel;
pub mod goal;
pub mod closer;
pub mod permission;
pub mod plan;
pub mod ads;
