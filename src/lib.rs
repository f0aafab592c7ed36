//! Build, persist, and reload transcript annotation databases.
//!
//! A database holds the transcript models of one genome assembly and one upstream source
//! together with the reference dictionary that their intervals refer to.  Databases are written
//! in a reproducible protobuf-based format (see `db::store`) and can be read back from that
//! format or from the older whole-object format (see `db::load`).

pub mod common;
pub mod db;
pub mod error;
pub mod model;
pub mod pbs;
