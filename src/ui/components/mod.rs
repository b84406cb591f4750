pub mod countdown_view;
pub mod drill_view;
pub mod exit_modal;
pub mod history_list;
pub mod home;
pub mod progress_bar;
pub mod results;
