pub mod auth_service;
pub mod auth_service_impl;
pub mod planning_service;
pub mod planning_service_impl;

pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;
pub use planning_service::{PlanningError, PlanningService};
pub use planning_service_impl::SeaOrmPlanningService;
