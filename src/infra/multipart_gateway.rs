use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::app::ports::SeedApiPort;
use crate::constants::{
    users_role_path, BIRDS_PATH, BIRD_PART, GROUPS_PATH, GROUP_PART, LOGIN_PATH, POST_PART,
    SIGHTINGS_PATH, SIGNUP_PATH,
};
use crate::error::Result;
use crate::fixtures::bird_image_url;
use crate::infra::http_client::GatewayClient;
use crate::types::{
    BirdFixture, Created, Flavor, ImageUpload, NewGroup, NewSighting, Role, Session, UserFixture,
};

/// Second-generation gateway: signup/login with cookie tokens and
/// multipart creates that accept an image.
pub struct MultipartGateway {
    http: GatewayClient,
}

impl MultipartGateway {
    pub fn new(http: GatewayClient) -> Self {
        Self { http }
    }

    async fn signup(&self, username: &str, password: &str) -> Result<Created> {
        let resp = self
            .http
            .post_json(SIGNUP_PATH, &json!({"username": username, "password": password}), None)
            .await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }
}

/// Sighting JSON part; the post service stores tags as a string map.
pub fn sighting_payload(sighting: &NewSighting<'_>) -> Value {
    let s = sighting.fixture;
    json!({
        "header": s.header,
        "textBody": s.text_body,
        "bird": sighting.bird_id,
        "group": sighting.group_id,
        "tags": {
            "latitude": s.latitude.to_string(),
            "longitude": s.longitude.to_string(),
        },
    })
}

pub fn group_payload(group: &NewGroup<'_>) -> Value {
    json!({
        "name": group.fixture.name,
        "description": group.fixture.description,
        "owner": {
            "userId": group.owner_id,
            "username": group.fixture.owner,
        },
    })
}

pub fn bird_payload(bird: &BirdFixture) -> Value {
    json!({
        "commonName": bird.common_name,
        "scientificName": bird.scientific_name,
        "imageURL": bird_image_url(bird.common_name),
    })
}

#[async_trait]
impl SeedApiPort for MultipartGateway {
    fn flavor(&self) -> Flavor {
        Flavor::Multipart
    }

    #[instrument(skip(self, password))]
    async fn register_admin(&self, username: &str, password: &str) -> Result<Created> {
        self.signup(username, password).await
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

    /// Accounts are self-service here; the admin token is not needed
    async fn create_user(&self, _token: &str, user: &UserFixture) -> Result<Created> {
        self.signup(user.username, user.password).await
    }

    async fn assign_role(&self, token: &str, user_id: &str, role: Role) -> Result<bool> {
        let resp = self
            .http
            .patch_json(&users_role_path(user_id), &json!({"role": role}), Some(token))
            .await?;
        if !resp.is_success() {
            debug!(status = resp.status, user_id, %role, "role change refused");
        }
        Ok(resp.is_success())
    }

    async fn create_bird(
        &self,
        token: &str,
        bird: &BirdFixture,
        image: Option<&ImageUpload>,
    ) -> Result<Created> {
        let resp = self
            .http
            .post_multipart(BIRDS_PATH, &[], BIRD_PART, &bird_payload(bird), image, Some(token))
            .await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }

    async fn list_birds(&self, token: &str) -> Result<Value> {
        Ok(self.http.get_json(BIRDS_PATH, Some(token)).await?.body)
    }

    async fn create_group(
        &self,
        token: &str,
        group: &NewGroup<'_>,
        image: Option<&ImageUpload>,
    ) -> Result<Created> {
        let resp = self
            .http
            .post_multipart(GROUPS_PATH, &[], GROUP_PART, &group_payload(group), image, Some(token))
            .await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }

    async fn list_groups(&self, token: &str) -> Result<Value> {
        Ok(self.http.get_json(GROUPS_PATH, Some(token)).await?.body)
    }

    async fn create_sighting(
        &self,
        token: &str,
        sighting: &NewSighting<'_>,
        image: Option<&ImageUpload>,
    ) -> Result<Created> {
        let resp = self
            .http
            .post_multipart(
                SIGHTINGS_PATH,
                &[("userId", sighting.user_id)],
                POST_PART,
                &sighting_payload(sighting),
                image,
                Some(token),
            )
            .await?;
        Ok(Created::from_status(resp.status, resp.id()))
    }
}
