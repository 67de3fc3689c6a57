mod dashboard;
pub use dashboard::{use_dashboard_session, Dashboard, DashboardSession, DashboardShell};
