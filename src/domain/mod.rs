pub mod entities;
pub mod filter;
pub mod markup;
pub mod pagination;
