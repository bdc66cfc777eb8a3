//! Domain entities and their insert/update payloads.
//!
//! Entities mirror table rows. The `New*` types carry the caller-supplied
//! fields of an insert or a whole-row update and own the validation rules
//! that run before any store I/O.

pub mod cart;
pub mod catalog;
pub mod collection;
pub mod order;
pub mod status;
pub mod user;

pub use cart::*;
pub use catalog::*;
pub use collection::*;
pub use order::*;
pub use status::*;
pub use user::*;
