//! Row selection over a remotely-paged dataset
//!
//! Only one page of records is resident at a time. Selection state spans the
//! whole dataset, and "select the first N records" is planned up front and
//! discharged page by page as pages load.

pub mod bulk;
pub mod error;
pub mod model;
pub mod selection;
pub mod session;
pub mod source;

pub use session::*;
