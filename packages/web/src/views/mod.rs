mod app_layout;
pub use app_layout::AppLayout;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::Dashboard;

mod projects;
pub use projects::Projects;

mod tasks;
pub use tasks::Tasks;

mod task_detail;
pub use task_detail::TaskDetail;
