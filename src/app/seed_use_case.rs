use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::app::ports::SeedApiPort;
use crate::app::report::{RecordKind, SeedReport};
use crate::config::AdminConfig;
use crate::constants::{ADMIN_ID_PLACEHOLDER, DEFAULT_ADMIN_USERNAME, GENERATED_ID_PLACEHOLDER};
use crate::error::{Result, SeedError};
use crate::extract::{find_id_by_name, COMMON_NAME_KEYS, NAME_KEYS};
use crate::fixtures::FixtureSet;
use crate::infra::image_library::ImageLibrary;
use crate::retry::{retry, Attempted, RetryPolicy};
use crate::types::{Created, Flavor, IdMap, NewGroup, NewSighting, Session, UserFixture};

/// Runs the seeding steps in order against one backend.
pub struct SeedUseCase<'a> {
    api: &'a dyn SeedApiPort,
    images: &'a ImageLibrary,
    admin: &'a AdminConfig,
    login_policy: RetryPolicy,
}

impl<'a> SeedUseCase<'a> {
    pub fn new(
        api: &'a dyn SeedApiPort,
        images: &'a ImageLibrary,
        admin: &'a AdminConfig,
        login_policy: RetryPolicy,
    ) -> Self {
        Self {
            api,
            images,
            admin,
            login_policy,
        }
    }

    /// Admin, users, roles, birds, groups, sightings.
    ///
    /// Only a missing admin token is fatal; record failures land in the report.
    #[instrument(skip_all, fields(flavor = %self.api.flavor()))]
    pub async fn run(&self, data: &FixtureSet) -> Result<SeedReport> {
        let mut report = SeedReport::new(self.api.flavor());
        info!(run_id = %report.run_id, "Starting BirdBook data seeding...");

        let session = self.bootstrap_admin().await?;
        let token = session.token.as_str();

        let mut users = self.seed_users(token, data.users, &mut report).await;
        users.insert(
            self.admin.username.clone(),
            session
                .user_id
                .clone()
                .unwrap_or_else(|| ADMIN_ID_PLACEHOLDER.to_string()),
        );
        report.users = users.len();

        match self.api.flavor() {
            Flavor::Multipart => self.assign_roles(token, data.users, &users, &mut report).await,
            Flavor::Legacy => info!("Roles were sent with each user, nothing to assign"),
        }

        let birds = self.seed_birds(token, data, &mut report).await;
        report.birds = birds.len();

        let groups = self.seed_groups(token, data, &users, &mut report).await;
        report.groups = groups.len();

        report.sightings = self
            .seed_sightings(token, data, &users, &birds, &groups, &mut report)
            .await;

        report.finish();
        info!("✓ Data seeding completed successfully!");
        info!("{}", report.summary_line());
        Ok(report)
    }

    /// Register the admin through the public endpoint and log in.
    #[instrument(skip(self), fields(admin = %self.admin.username))]
    pub async fn bootstrap_admin(&self) -> Result<Session> {
        info!("Creating initial admin user...");
        let AdminConfig { username, password } = self.admin;

        match self.api.register_admin(username, password).await? {
            Created::Created(_) => info!("  ✓ Admin user registered"),
            Created::AlreadyExists => warn!("  ℹ Admin user already exists"),
            Created::Rejected(status) => {
                error!("  ✗ Failed to register admin: {}", status);
                return Err(SeedError::Auth(format!(
                    "Failed to register admin: {status}"
                )));
            }
        }

        info!("  Logging in as admin...");
        let policy = match self.api.flavor() {
            Flavor::Multipart => self.login_policy,
            Flavor::Legacy => RetryPolicy::new(1, Duration::ZERO),
        };
        let outcome = retry(policy, |_| async move {
            match self.api.login(username, password).await {
                Ok(Some(session)) => Ok(session),
                Ok(None) => Err("no token in login response".to_string()),
                Err(e) => Err(e.to_string()),
            }
        })
        .await;

        match outcome {
            Attempted::Succeeded { value, .. } => {
                info!("  ✓ Got authentication token");
                Ok(value)
            }
            Attempted::Exhausted { last_error, attempts } => {
                error!(attempts, "  ✗ Login failed: {}", last_error);
                Err(SeedError::Auth(format!(
                    "Failed to get authentication token: {last_error}"
                )))
            }
        }
    }

    /// Fixtures name the default admin; the run may use another account.
    fn user_id<'m>(&self, users: &'m IdMap, username: &str) -> Option<&'m String> {
        if username == DEFAULT_ADMIN_USERNAME {
            users.get(&self.admin.username)
        } else {
            users.get(username)
        }
    }

    /// Log in as `user` to learn its id. Only the multipart API hands out ids on login.
    async fn recover_user_id(&self, user: &UserFixture) -> Option<String> {
        if self.api.flavor() == Flavor::Legacy {
            return None;
        }
        match self.api.login(user.username, user.password).await {
            Ok(Some(session)) => session.user_id,
            Ok(None) => None,
            Err(e) => {
                warn!("  Could not log in as {}: {}", user.username, e);
                None
            }
        }
    }

    pub async fn seed_users(
        &self,
        token: &str,
        users: &[UserFixture],
        report: &mut SeedReport,
    ) -> IdMap {
        info!("Creating additional users...");
        let mut map = IdMap::new();

        for user in users {
            match self.api.create_user(token, user).await {
                Ok(Created::Created(id)) => {
                    let id = match id {
                        Some(id) => id,
                        None => self
                            .recover_user_id(user)
                            .await
                            .unwrap_or_else(|| GENERATED_ID_PLACEHOLDER.to_string()),
                    };
                    map.insert(user.username.to_string(), id);
                    report.created(RecordKind::User);
                    info!("  ✓ Created user: {}", user.username);
                }
                Ok(Created::AlreadyExists) => match self.recover_user_id(user).await {
                    Some(id) => {
                        map.insert(user.username.to_string(), id);
                        info!("  ℹ User {} already exists, reusing it", user.username);
                    }
                    None => {
                        error!("  ✗ User {} already exists and its id is unknown", user.username);
                        report.fail(
                            RecordKind::User,
                            format!("{} already exists and its id is unknown", user.username),
                        );
                    }
                },
                Ok(Created::Rejected(status)) => {
                    error!("  ✗ Failed to create {}: {}", user.username, status);
                    report.fail(
                        RecordKind::User,
                        format!("Failed to create {}: {}", user.username, status),
                    );
                }
                Err(e) => {
                    error!("  ✗ Error creating {}: {}", user.username, e);
                    report.fail(
                        RecordKind::User,
                        format!("Error creating {}: {}", user.username, e),
                    );
                }
            }
        }

        info!("Created {} users", map.len());
        map
    }

    /// Promote users whose fixture role is above a basic account.
    pub async fn assign_roles(
        &self,
        token: &str,
        users: &[UserFixture],
        ids: &IdMap,
        report: &mut SeedReport,
    ) {
        info!("Assigning roles...");
        for user in users.iter().filter(|u| u.role.needs_assignment()) {
            let Some(user_id) = ids.get(user.username) else {
                // creation already failed and was reported
                warn!("  Skipping role for {}, user was not created", user.username);
                continue;
            };
            if is_placeholder(user_id) {
                warn!("  ✗ No id for {}, cannot assign {}", user.username, user.role);
                report.fail(
                    RecordKind::Role,
                    format!("No id for {}, role {} not assigned", user.username, user.role),
                );
                continue;
            }
            match self.api.assign_role(token, user_id, user.role).await {
                Ok(true) => {
                    report.roles_assigned += 1;
                    report.created(RecordKind::Role);
                    info!("  ✓ {} is now {}", user.username, user.role);
                }
                Ok(false) => {
                    error!("  ✗ Role {} refused for {}", user.role, user.username);
                    report.fail(
                        RecordKind::Role,
                        format!("Role {} refused for {}", user.role, user.username),
                    );
                }
                Err(e) => {
                    error!("  ✗ Error assigning role to {}: {}", user.username, e);
                    report.fail(
                        RecordKind::Role,
                        format!("Error assigning role to {}: {}", user.username, e),
                    );
                }
            }
        }
    }

    pub async fn seed_birds(
        &self,
        token: &str,
        data: &FixtureSet,
        report: &mut SeedReport,
    ) -> IdMap {
        info!("Creating birds...");
        let mut map = IdMap::new();

        for bird in data.birds {
            let image = self.images.lookup(bird.common_name);
            let outcome = match self.api.create_bird(token, bird, image.as_ref()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("  ✗ Error creating {}: {}", bird.common_name, e);
                    report.fail(
                        RecordKind::Bird,
                        format!("Error creating {}: {}", bird.common_name, e),
                    );
                    continue;
                }
            };
            let existed = outcome == Created::AlreadyExists;
            let resolved = settle_id(outcome, bird.common_name, COMMON_NAME_KEYS, || {
                self.api.list_birds(token)
            })
            .await;
            match resolved {
                Ok(id) => {
                    map.insert(bird.common_name.to_string(), id);
                    if existed {
                        info!("  ℹ Bird {} already exists, reusing it", bird.common_name);
                    } else {
                        report.created(RecordKind::Bird);
                        info!("  ✓ Created bird: {}", bird.common_name);
                    }
                }
                Err(message) => {
                    error!("  ✗ {}", message);
                    report.fail(RecordKind::Bird, message);
                }
            }
        }

        info!("Created {} birds", map.len());
        map
    }

    pub async fn seed_groups(
        &self,
        token: &str,
        data: &FixtureSet,
        users: &IdMap,
        report: &mut SeedReport,
    ) -> IdMap {
        info!("Creating groups...");
        let mut map = IdMap::new();

        for group in data.groups {
            let Some(owner_id) = self.user_id(users, group.owner) else {
                error!("  ✗ Owner {} not found", group.owner);
                report.fail(
                    RecordKind::Group,
                    format!("Owner {} not found for {}", group.owner, group.name),
                );
                continue;
            };
            let new_group = NewGroup {
                fixture: group,
                owner_id,
            };
            let image = self.images.lookup(group.name);
            let outcome = match self.api.create_group(token, &new_group, image.as_ref()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("  ✗ Error creating {}: {}", group.name, e);
                    report.fail(
                        RecordKind::Group,
                        format!("Error creating {}: {}", group.name, e),
                    );
                    continue;
                }
            };
            let existed = outcome == Created::AlreadyExists;
            let resolved =
                settle_id(outcome, group.name, NAME_KEYS, || self.api.list_groups(token)).await;
            match resolved {
                Ok(id) => {
                    map.insert(group.name.to_string(), id);
                    if existed {
                        info!("  ℹ Group {} already exists, reusing it", group.name);
                    } else {
                        report.created(RecordKind::Group);
                        info!("  ✓ Created group: {}", group.name);
                    }
                }
                Err(message) => {
                    error!("  ✗ {}", message);
                    report.fail(RecordKind::Group, message);
                }
            }
        }

        info!("Created {} groups", map.len());
        map
    }

    /// Returns how many sightings the backend accepted.
    pub async fn seed_sightings(
        &self,
        token: &str,
        data: &FixtureSet,
        users: &IdMap,
        birds: &IdMap,
        groups: &IdMap,
        report: &mut SeedReport,
    ) -> usize {
        info!("Creating posts...");
        let mut created = 0;

        for sighting in data.sightings {
            let (Some(user_id), Some(bird_id), Some(group_id)) = (
                self.user_id(users, sighting.author),
                birds.get(sighting.bird),
                groups.get(sighting.group),
            ) else {
                error!("  ✗ Missing IDs for post by {}", sighting.author);
                report.fail(
                    RecordKind::Sighting,
                    format!("Missing IDs for post by {}", sighting.author),
                );
                continue;
            };
            let new_sighting = NewSighting {
                fixture: sighting,
                user_id,
                bird_id,
                group_id,
            };
            let image = self.images.lookup(sighting.header);
            match self
                .api
                .create_sighting(token, &new_sighting, image.as_ref())
                .await
            {
                Ok(Created::Created(_)) => {
                    created += 1;
                    report.created(RecordKind::Sighting);
                    info!("  ✓ Created post: {}", sighting.header);
                }
                Ok(Created::AlreadyExists) => {
                    warn!("  ℹ Post already exists: {}", sighting.header);
                }
                Ok(Created::Rejected(status)) => {
                    error!("  ✗ Failed to create post: {}", status);
                    report.fail(
                        RecordKind::Sighting,
                        format!("Failed to create post '{}': {}", sighting.header, status),
                    );
                }
                Err(e) => {
                    error!("  ✗ Error creating post: {}", e);
                    report.fail(
                        RecordKind::Sighting,
                        format!("Error creating post '{}': {}", sighting.header, e),
                    );
                }
            }
        }

        info!("Created {} posts", created);
        created
    }
}

fn is_placeholder(id: &str) -> bool {
    id == ADMIN_ID_PLACEHOLDER || id == GENERATED_ID_PLACEHOLDER
}

/// Turn a create outcome into an id, listing the resource when the
/// response did not carry one.
async fn settle_id<F, Fut>(
    outcome: Created,
    name: &str,
    name_keys: &[&str],
    list: F,
) -> std::result::Result<String, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    match outcome {
        Created::Created(Some(id)) => Ok(id),
        Created::Created(None) => Ok(lookup_by_name(list, name_keys, name)
            .await
            .unwrap_or_else(|| GENERATED_ID_PLACEHOLDER.to_string())),
        Created::AlreadyExists => lookup_by_name(list, name_keys, name)
            .await
            .ok_or_else(|| format!("{name} already exists but was not found in the listing")),
        Created::Rejected(status) => Err(format!("Failed to create {name}: {status}")),
    }
}

async fn lookup_by_name<F, Fut>(list: F, name_keys: &[&str], name: &str) -> Option<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    match list().await {
        Ok(listing) => find_id_by_name(&listing, name_keys, name),
        Err(e) => {
            warn!("  Lookup for {} failed: {}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::SeedApiPort;
    use crate::fixtures;
    use crate::types::{BirdFixture, ImageUpload, Role};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory backend recording what the seeder sent.
    #[derive(Default)]
    struct FakeApi {
        flavor: Flavor,
        existing_users: HashSet<&'static str>,
        rejected_birds: HashSet<&'static str>,
        existing_birds: HashSet<&'static str>,
        existing_groups: HashSet<&'static str>,
        omit_ids: bool,
        // listings come back empty
        unlisted: bool,
        fail_user_login: bool,
        logins: Mutex<Vec<String>>,
        admin_register_status: Option<u16>,
        admin_login_failures: Mutex<u32>,
        birds: Mutex<Vec<(String, String)>>,
        groups: Mutex<Vec<(String, String)>>,
        group_owners: Mutex<Vec<String>>,
        roles: Mutex<Vec<(String, Role)>>,
        sightings: Mutex<Vec<(String, String, String)>>,
    }

    fn id_for(prefix: &str, name: &str) -> String {
        format!("{prefix}-{}", name.to_lowercase().replace(' ', "-"))
    }

    #[async_trait]
    impl SeedApiPort for FakeApi {
        fn flavor(&self) -> Flavor {
            self.flavor
        }

        async fn register_admin(&self, username: &str, _password: &str) -> Result<Created> {
            Ok(match self.admin_register_status {
                Some(status) => Created::from_status(status, None),
                None => Created::Created(Some(id_for("user", username))),
            })
        }

        async fn login(&self, username: &str, _password: &str) -> Result<Option<Session>> {
            self.logins.lock().unwrap().push(username.to_string());
            let is_admin = matches!(username, "admin_alice" | "root_admin");
            let mut failures = self.admin_login_failures.lock().unwrap();
            if is_admin && *failures > 0 {
                *failures -= 1;
                return Ok(None);
            }
            if !is_admin && self.fail_user_login {
                return Ok(None);
            }
            Ok(Some(Session {
                user_id: Some(id_for("user", username)),
                token: format!("tok-{username}"),
            }))
        }

        async fn create_user(&self, token: &str, user: &UserFixture) -> Result<Created> {
            assert!(token.starts_with("tok-"));
            if self.existing_users.contains(user.username) {
                return Ok(Created::AlreadyExists);
            }
            let id = (!self.omit_ids).then(|| id_for("user", user.username));
            Ok(Created::Created(id))
        }

        async fn assign_role(&self, _token: &str, user_id: &str, role: Role) -> Result<bool> {
            self.roles.lock().unwrap().push((user_id.to_string(), role));
            Ok(true)
        }

        async fn create_bird(
            &self,
            _token: &str,
            bird: &BirdFixture,
            _image: Option<&ImageUpload>,
        ) -> Result<Created> {
            if self.rejected_birds.contains(bird.common_name) {
                return Ok(Created::Rejected(500));
            }
            let id = id_for("bird", bird.common_name);
            self.birds
                .lock()
                .unwrap()
                .push((id.clone(), bird.common_name.to_string()));
            if self.existing_birds.contains(bird.common_name) {
                return Ok(Created::AlreadyExists);
            }
            Ok(Created::Created((!self.omit_ids).then_some(id)))
        }

        async fn list_birds(&self, _token: &str) -> Result<Value> {
            if self.unlisted {
                return Ok(json!([]));
            }
            let birds = self.birds.lock().unwrap();
            Ok(Value::Array(
                birds
                    .iter()
                    .map(|(id, name)| json!({"_id": id, "commonName": name}))
                    .collect(),
            ))
        }

        async fn create_group(
            &self,
            _token: &str,
            group: &NewGroup<'_>,
            _image: Option<&ImageUpload>,
        ) -> Result<Created> {
            let id = id_for("group", group.fixture.name);
            self.groups
                .lock()
                .unwrap()
                .push((id.clone(), group.fixture.name.to_string()));
            self.group_owners.lock().unwrap().push(group.owner_id.to_string());
            if self.existing_groups.contains(group.fixture.name) {
                return Ok(Created::AlreadyExists);
            }
            Ok(Created::Created((!self.omit_ids).then_some(id)))
        }

        async fn list_groups(&self, _token: &str) -> Result<Value> {
            if self.unlisted {
                return Ok(json!({"content": []}));
            }
            let groups = self.groups.lock().unwrap();
            Ok(json!({
                "content": groups
                    .iter()
                    .map(|(id, name)| json!({"id": id, "name": name}))
                    .collect::<Vec<_>>()
            }))
        }

        async fn create_sighting(
            &self,
            _token: &str,
            sighting: &NewSighting<'_>,
            _image: Option<&ImageUpload>,
        ) -> Result<Created> {
            self.sightings.lock().unwrap().push((
                sighting.user_id.to_string(),
                sighting.bird_id.to_string(),
                sighting.group_id.to_string(),
            ));
            Ok(Created::Created(None))
        }
    }

    fn admin() -> AdminConfig {
        AdminConfig::default()
    }

    fn use_case<'a>(
        api: &'a FakeApi,
        images: &'a ImageLibrary,
        admin: &'a AdminConfig,
    ) -> SeedUseCase<'a> {
        SeedUseCase::new(api, images, admin, RetryPolicy::new(3, Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn seeds_the_full_fixture_set() {
        let api = FakeApi::default();
        let images = ImageLibrary::default();
        let admin = admin();
        let report = use_case(&api, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap();

        assert_eq!(report.users, 7);
        assert_eq!(report.birds, 10);
        assert_eq!(report.groups, 5);
        assert_eq!(report.sightings, 5);
        assert_eq!(report.roles_assigned, 1);
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert_eq!(report.summary_line(), "Created: 7 users, 10 birds, 5 groups");

        assert_eq!(
            *api.roles.lock().unwrap(),
            vec![("user-super_sam".to_string(), Role::SuperUser)]
        );
        let sightings = api.sightings.lock().unwrap();
        assert_eq!(
            sightings[0],
            (
                "user-rockpigeonlover41".to_string(),
                "bird-rock-pigeon".to_string(),
                "group-dfw-birders".to_string()
            )
        );
    }

    #[tokio::test]
    async fn recovers_ids_by_listing_when_responses_omit_them() {
        let api = FakeApi {
            omit_ids: true,
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let report = use_case(&api, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap();

        // users come back through login, birds and groups through the listing
        assert_eq!(report.sightings, 5);
        let sightings = api.sightings.lock().unwrap();
        assert!(sightings
            .iter()
            .all(|(u, b, g)| u.starts_with("user-") && b.starts_with("bird-") && g.starts_with("group-")));
    }

    #[tokio::test]
    async fn existing_users_are_reused() {
        let api = FakeApi {
            existing_users: ["taylor_b"].into_iter().collect(),
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let mut report = SeedReport::new(Flavor::Multipart);
        let map = use_case(&api, &images, &admin)
            .seed_users("tok-admin_alice", fixtures::USERS, &mut report)
            .await;
        assert_eq!(map.get("taylor_b").map(String::as_str), Some("user-taylor_b"));
        assert_eq!(map.len(), fixtures::USERS.len());
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn rejected_bird_skips_dependent_sighting() {
        let api = FakeApi {
            rejected_birds: ["Barred Owl"].into_iter().collect(),
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let report = use_case(&api, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap();

        assert_eq!(report.birds, 9);
        assert_eq!(report.sightings, 4);
        assert_eq!(report.failures_of(RecordKind::Bird), 1);
        assert!(report
            .failures
            .iter()
            .any(|f| f.message == "Missing IDs for post by owl_at_dawn"));
    }

    #[tokio::test]
    async fn unknown_group_owner_is_skipped() {
        const GROUPS: &[crate::types::GroupFixture] = &[crate::types::GroupFixture {
            name: "Night Owls",
            description: "",
            owner: "nobody",
        }];
        let data = FixtureSet {
            users: &[],
            birds: &[],
            groups: GROUPS,
            sightings: &[],
        };
        let api = FakeApi::default();
        let images = ImageLibrary::default();
        let admin = admin();
        let mut report = SeedReport::new(Flavor::Multipart);
        let groups = use_case(&api, &images, &admin)
            .seed_groups("tok", &data, &IdMap::new(), &mut report)
            .await;
        assert!(groups.is_empty());
        assert_eq!(report.failures_of(RecordKind::Group), 1);
        assert!(api.groups.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn admin_login_is_retried_in_multipart_flavor() {
        let api = FakeApi {
            admin_login_failures: Mutex::new(2),
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let session = use_case(&api, &images, &admin).bootstrap_admin().await.unwrap();
        assert_eq!(session.token, "tok-admin_alice");
        assert_eq!(session.user_id.as_deref(), Some("user-admin_alice"));
    }

    #[tokio::test]
    async fn legacy_flavor_logs_in_once() {
        let api = FakeApi {
            flavor: Flavor::Legacy,
            admin_login_failures: Mutex::new(1),
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let err = use_case(&api, &images, &admin)
            .bootstrap_admin()
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Auth(_)));
    }

    #[tokio::test]
    async fn existing_admin_still_logs_in_but_rejected_admin_aborts() {
        let images = ImageLibrary::default();
        let admin = admin();

        let existing = FakeApi {
            admin_register_status: Some(409),
            ..Default::default()
        };
        assert!(use_case(&existing, &images, &admin).bootstrap_admin().await.is_ok());

        let rejected = FakeApi {
            admin_register_status: Some(400),
            ..Default::default()
        };
        let err = use_case(&rejected, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Auth(_)));
        assert!(rejected.birds.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn existing_birds_and_groups_are_found_in_the_listing() {
        let api = FakeApi {
            existing_birds: ["Barred Owl"].into_iter().collect(),
            existing_groups: ["DFW Birders"].into_iter().collect(),
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let report = use_case(&api, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap();

        assert_eq!(report.birds, 10);
        assert_eq!(report.groups, 5);
        assert_eq!(report.sightings, 5);
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        let sightings = api.sightings.lock().unwrap();
        assert!(sightings.iter().any(|(_, b, _)| b == "bird-barred-owl"));
        assert!(sightings.iter().any(|(_, _, g)| g == "group-dfw-birders"));
    }

    #[tokio::test]
    async fn placeholder_ids_never_get_roles() {
        let api = FakeApi {
            omit_ids: true,
            fail_user_login: true,
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let mut report = SeedReport::new(Flavor::Multipart);
        let case = use_case(&api, &images, &admin);
        let users = case
            .seed_users("tok-admin_alice", fixtures::USERS, &mut report)
            .await;
        assert_eq!(
            users.get("super_sam").map(String::as_str),
            Some(GENERATED_ID_PLACEHOLDER)
        );

        case.assign_roles("tok-admin_alice", fixtures::USERS, &users, &mut report)
            .await;
        assert!(api.roles.lock().unwrap().is_empty());
        assert_eq!(report.roles_assigned, 0);
        assert_eq!(report.failures_of(RecordKind::Role), 1);
    }

    #[tokio::test]
    async fn unlisted_record_without_id_gets_generated_placeholder() {
        let api = FakeApi {
            omit_ids: true,
            unlisted: true,
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let mut report = SeedReport::new(Flavor::Multipart);
        let birds = use_case(&api, &images, &admin)
            .seed_birds("tok", &fixtures::all(), &mut report)
            .await;
        assert_eq!(birds.len(), fixtures::BIRDS.len());
        assert!(birds.values().all(|id| id == GENERATED_ID_PLACEHOLDER));
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn existing_bird_missing_from_listing_is_a_failure() {
        let api = FakeApi {
            existing_birds: ["Mallard"].into_iter().collect(),
            unlisted: true,
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let mut report = SeedReport::new(Flavor::Multipart);
        let birds = use_case(&api, &images, &admin)
            .seed_birds("tok", &fixtures::all(), &mut report)
            .await;
        assert!(!birds.contains_key("Mallard"));
        assert_eq!(report.failures_of(RecordKind::Bird), 1);
    }

    #[tokio::test]
    async fn legacy_flavor_skips_role_assignment() {
        let api = FakeApi {
            flavor: Flavor::Legacy,
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let report = use_case(&api, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap();
        assert_eq!(report.roles_assigned, 0);
        assert_eq!(report.failures_of(RecordKind::Role), 0);
        assert!(api.roles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn legacy_existing_user_is_reported_without_login() {
        let api = FakeApi {
            flavor: Flavor::Legacy,
            existing_users: ["taylor_b"].into_iter().collect(),
            ..Default::default()
        };
        let images = ImageLibrary::default();
        let admin = admin();
        let mut report = SeedReport::new(Flavor::Legacy);
        let users = use_case(&api, &images, &admin)
            .seed_users("tok-admin_alice", fixtures::USERS, &mut report)
            .await;
        assert!(!users.contains_key("taylor_b"));
        assert_eq!(report.failures_of(RecordKind::User), 1);
        assert!(api.logins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fixtures_owned_by_default_admin_follow_configured_admin() {
        let api = FakeApi::default();
        let images = ImageLibrary::default();
        let admin = AdminConfig {
            username: "root_admin".to_string(),
            password: "Root1!".to_string(),
        };
        let report = use_case(&api, &images, &admin)
            .run(&fixtures::all())
            .await
            .unwrap();

        assert_eq!(report.groups, 5);
        assert_eq!(report.sightings, 5);
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        let owners = api.group_owners.lock().unwrap();
        assert_eq!(owners[0], "user-root_admin");
        assert!(!owners.iter().any(|o| o == "user-admin_alice"));
    }
}
