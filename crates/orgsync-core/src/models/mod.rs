pub mod permission;
pub mod record;
