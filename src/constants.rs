/// Endpoint and default constants shared across the seeder.
/// Paths are relative to the API gateway base URL.

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONFIG_FILE: &str = "seed.toml";

pub const DEFAULT_MAX_RETRIES: u32 = 30;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 2;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 2;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin_alice";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin1!";

/// (service name, health URL) checked in order before seeding
pub const DEFAULT_SERVICES: &[(&str, &str)] = &[
    ("Eureka", "http://localhost:8761/actuator/health"),
    ("API Gateway", "http://localhost:8080/actuator/health"),
    ("User Service", "http://localhost:8081/actuator/health"),
    ("Bird Service", "http://localhost:8082/actuator/health"),
    ("Post Service", "http://localhost:8083/actuator/health"),
    ("Group Service", "http://localhost:8084/actuator/health"),
];

// Legacy (JSON) endpoints
pub const USERS_PATH: &str = "/users";
pub const LOGIN_PATH: &str = "/auth/login";
pub const BIRDS_PATH: &str = "/birds";
pub const GROUPS_PATH: &str = "/groups";
pub const POSTS_PATH: &str = "/posts";

// Multipart endpoints
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const SIGHTINGS_PATH: &str = "/sightings";

// Multipart part names
pub const BIRD_PART: &str = "bird";
pub const GROUP_PART: &str = "group";
pub const POST_PART: &str = "post";
pub const IMAGE_PART: &str = "image";

/// Cookie the user service stores the session token in
pub const JWT_COOKIE: &str = "jwt";

/// Stand-ins recorded when a create succeeds without returning an id
pub const ADMIN_ID_PLACEHOLDER: &str = "admin_id";
pub const GENERATED_ID_PLACEHOLDER: &str = "generated_id";

pub const WIKIMEDIA_FILE_PATH: &str = "https://commons.wikimedia.org/wiki/Special:FilePath";

pub fn users_role_path(user_id: &str) -> String {
    format!("{USERS_PATH}/{user_id}/role")
}
