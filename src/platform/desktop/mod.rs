pub mod blocking;
pub mod dialog;
