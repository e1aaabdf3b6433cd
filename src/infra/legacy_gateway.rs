use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::app::ports::SeedApiPort;
use crate::constants::{BIRDS_PATH, GROUPS_PATH, LOGIN_PATH, POSTS_PATH, USERS_PATH};
use crate::error::{Result, SeedError};
use crate::fixtures::bird_image_url;
use crate::infra::http_client::GatewayClient;
use crate::types::{
    BirdFixture, Created, Flavor, ImageUpload, NewGroup, NewSighting, Role, Session, UserFixture,
};

/// First-generation gateway: plain JSON bodies, roles set at creation.
pub struct LegacyGateway {
    http: GatewayClient,
}

impl LegacyGateway {
    pub fn new(http: GatewayClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SeedApiPort for LegacyGateway {
    fn flavor(&self) -> Flavor {
        Flavor::Legacy
    }

    #[instrument(skip(self, password))]
    async fn register_admin(&self, username: &str, password: &str) -> Result<Created> {
        let resp = self
            .http
            .post_json(USERS_PATH, &json!({"username": username, "password": password}), None)
            .await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }

    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        let resp = self
            .http
            .post_json(LOGIN_PATH, &json!({"username": username, "password": password}), None)
            .await?;
        if resp.status != 200 {
            debug!(status = resp.status, "login refused");
            return Ok(None);
        }
        Ok(resp.token().map(|token| Session {
            user_id: resp.id(),
            token,
        }))
    }

    async fn create_user(&self, token: &str, user: &UserFixture) -> Result<Created> {
        let body = json!({
            "username": user.username,
            "password": user.password,
            "role": user.role,
        });
        let resp = self.http.post_json(USERS_PATH, &body, Some(token)).await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }

    /// The role travels with the create call here
    async fn assign_role(&self, _token: &str, _user_id: &str, role: Role) -> Result<bool> {
        Err(SeedError::Api {
            message: format!("legacy API cannot change a role after creation ({role})"),
        })
    }

    async fn create_bird(
        &self,
        token: &str,
        bird: &BirdFixture,
        _image: Option<&ImageUpload>,
    ) -> Result<Created> {
        let body = json!({
            "commonName": bird.common_name,
            "scientificName": bird.scientific_name,
            "imageURL": bird_image_url(bird.common_name),
        });
        let resp = self.http.post_json(BIRDS_PATH, &body, Some(token)).await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }

    async fn list_birds(&self, token: &str) -> Result<Value> {
        Ok(self.http.get_json(BIRDS_PATH, Some(token)).await?.body)
    }

    async fn create_group(
        &self,
        token: &str,
        group: &NewGroup<'_>,
        _image: Option<&ImageUpload>,
    ) -> Result<Created> {
        let body = json!({
            "name": group.fixture.name,
            "ownerId": group.owner_id,
        });
        let resp = self.http.post_json(GROUPS_PATH, &body, Some(token)).await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }

    async fn list_groups(&self, token: &str) -> Result<Value> {
        Ok(self.http.get_json(GROUPS_PATH, Some(token)).await?.body)
    }

    async fn create_sighting(
        &self,
        token: &str,
        sighting: &NewSighting<'_>,
        _image: Option<&ImageUpload>,
    ) -> Result<Created> {
        let s = sighting.fixture;
        let body = json!({
            "header": s.header,
            "textBody": s.text_body,
            "userId": sighting.user_id,
            "birdId": sighting.bird_id,
            "groupId": sighting.group_id,
            "tags": {
                "latitude": s.latitude,
                "longitude": s.longitude,
            },
        });
        let resp = self.http.post_json(POSTS_PATH, &body, Some(token)).await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }
}
