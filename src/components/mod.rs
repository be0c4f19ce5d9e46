//! UI Components
//!
//! Pages and the pieces shared between them.

pub mod auth_forms;
pub mod badges;
pub mod board_management;
pub mod create_board;
pub mod create_feedback;
pub mod dashboard;
pub mod delete_confirm_button;
pub mod feedback_details;
pub mod feedback_kanban;
pub mod feedback_list;
pub mod feedback_table;
pub mod flash_banner;
pub mod nav_bar;
pub mod tag_autocomplete;

pub use auth_forms::{LoginPage, RegisterPage};
pub use badges::Spinner;
pub use board_management::BoardManagement;
pub use create_board::CreateBoard;
pub use create_feedback::CreateFeedback;
pub use dashboard::Dashboard;
pub use feedback_details::FeedbackDetails;
pub use feedback_list::FeedbackList;
pub use flash_banner::FlashBanner;
pub use nav_bar::NavBar;
