pub mod celebration;
pub mod login_form;
pub mod menu;
pub mod question_card;
pub mod timer_gauge;
pub mod wheel;
