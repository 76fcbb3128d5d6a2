pub mod assignments;

pub mod auth;

pub mod certificates;

pub mod courses;

pub mod organizations;

pub mod progress;

pub mod users;

pub use assignments::{configure_assignment_routes, configure_section_routes};
pub use auth::configure_auth_routes;
pub use certificates::configure_certificate_routes;
pub use courses::configure_course_routes;
pub use organizations::configure_organization_routes;
pub use progress::configure_progress_routes;
pub use users::configure_user_routes;
