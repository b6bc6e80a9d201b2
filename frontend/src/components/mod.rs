pub mod bulk;
pub mod filter_panel;
pub mod helpers;
pub mod history;
pub mod operator_select;
pub mod pager;
pub mod resources;
