//! Listing queries shared by both rosters: parameter parsing, filter
//! predicates and page windows. Everything here is pure.

mod filter;
mod pagination;
mod params;

pub use filter::{Condition, Filter, Identifier, ListCriteria};
pub use pagination::{LIST_PAGE_SIZE, MAX_OFFSET, PageInfo, PageWindow};
pub use params::{IdentifierKind, ListParams, ListQuery, ParamError};
