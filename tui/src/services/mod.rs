pub mod auto_refresh;
pub mod preferences;
pub mod refresh;
pub mod table;
pub mod toast;
