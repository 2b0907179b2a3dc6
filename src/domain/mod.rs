pub mod debounce;
pub mod entities;
pub mod pagination;
