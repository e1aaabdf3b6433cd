use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use uuid::Uuid;

use crate::types::Flavor;

/// Record kinds used as the `kind` metric label and in failure messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    User,
    Role,
    Bird,
    Group,
    Sighting,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Role => "role",
            RecordKind::Bird => "bird",
            RecordKind::Group => "group",
            RecordKind::Sighting => "sighting",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Failure {
    pub kind: RecordKind,
    pub message: String,
}

/// Outcome of a seed run
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub run_id: Uuid,
    pub flavor: Flavor,
    /// Users in the id map, admin included
    pub users: usize,
    pub birds: usize,
    pub groups: usize,
    pub sightings: usize,
    pub roles_assigned: usize,
    pub failures: Vec<Failure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SeedReport {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            flavor,
            users: 0,
            birds: 0,
            groups: 0,
            sightings: 0,
            roles_assigned: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn created(&self, kind: RecordKind) {
        counter!("seed_records_created_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn fail(&mut self, kind: RecordKind, message: impl Into<String>) {
        counter!("seed_records_failed_total", "kind" => kind.as_str()).increment(1);
        self.failures.push(Failure {
            kind,
            message: message.into(),
        });
    }

    pub fn failures_of(&self, kind: RecordKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// The closing line of a run
    pub fn summary_line(&self) -> String {
        format!(
            "Created: {} users, {} birds, {} groups",
            self.users, self.birds, self.groups
        )
    }

    pub fn print_summary(&self) {
        println!("\n📊 Seed Results ({} flavor, run {}):", self.flavor, self.run_id);
        println!("   Users: {}", self.users);
        println!("   Roles assigned: {}", self.roles_assigned);
        println!("   Birds: {}", self.birds);
        println!("   Groups: {}", self.groups);
        println!("   Sightings: {}", self.sightings);
        if let Some(done) = self.finished_at {
            let secs = (done - self.started_at).num_milliseconds() as f64 / 1000.0;
            println!("   Duration: {secs:.1}s");
        }
        if !self.failures.is_empty() {
            println!("\n⚠️  {} records failed:", self.failures.len());
            for f in &self.failures {
                println!("   - [{}] {}", f.kind.as_str(), f.message);
            }
        }
    }
}
