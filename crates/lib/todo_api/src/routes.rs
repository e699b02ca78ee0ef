//! Route paths.

pub const GET_HEALTH: &str = "/api/v1/health";
pub const POST_AUTH_SIGN_UP: &str = "/api/v1/auth/sign-up";
pub const POST_AUTH_SIGN_IN: &str = "/api/v1/auth/sign-in";
pub const GET_AUTH_ME: &str = "/api/v1/auth/me";
pub const TASKS: &str = "/api/v1/task";
pub const TASKS_ID: &str = "/api/v1/task/{id}";
