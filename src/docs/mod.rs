//! Documentation fetch and text indexing
//!
//! Cache-aside fetching of upstream documents plus the text transforms the
//! docs tools run over them: index search, heading outlines, and paging.

pub mod cache;
pub mod fetcher;
pub mod paginate;
pub mod search;
pub mod sections;
