pub mod backfill;
pub mod featured;
pub mod id;
pub mod lint;
pub mod list;
pub mod submit;
