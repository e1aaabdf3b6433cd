use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{
    BirdFixture, Created, Flavor, ImageUpload, NewGroup, NewSighting, Role, Session, UserFixture,
};

#[async_trait]
pub trait HealthProbePort: Send + Sync {
    /// HTTP status of a GET against `url`
    async fn status(&self, url: &str) -> Result<u16>;
}

/// Everything a seed run needs from the backend.
///
/// Transport failures are `Err`; HTTP statuses are folded into the returned values.
#[async_trait]
pub trait SeedApiPort: Send + Sync {
    fn flavor(&self) -> Flavor;

    /// Create the first account through the public endpoint
    async fn register_admin(&self, username: &str, password: &str) -> Result<Created>;

    /// `Ok(None)` when the credentials are refused or no token comes back
    async fn login(&self, username: &str, password: &str) -> Result<Option<Session>>;

    async fn create_user(&self, token: &str, user: &UserFixture) -> Result<Created>;

    /// Returns whether the backend accepted the change
    async fn assign_role(&self, token: &str, user_id: &str, role: Role) -> Result<bool>;

    async fn create_bird(
        &self,
        token: &str,
        bird: &BirdFixture,
        image: Option<&ImageUpload>,
    ) -> Result<Created>;

    async fn list_birds(&self, token: &str) -> Result<Value>;

    async fn create_group(
        &self,
        token: &str,
        group: &NewGroup<'_>,
        image: Option<&ImageUpload>,
    ) -> Result<Created>;

    async fn list_groups(&self, token: &str) -> Result<Value>;

    async fn create_sighting(
        &self,
        token: &str,
        sighting: &NewSighting<'_>,
        image: Option<&ImageUpload>,
    ) -> Result<Created>;
}
