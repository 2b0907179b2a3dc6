pub mod browser_state;
