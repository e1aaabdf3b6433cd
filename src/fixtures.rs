//! Demo data inserted by a seed run.

use crate::constants::WIKIMEDIA_FILE_PATH;
use crate::types::{BirdFixture, GroupFixture, Role, SightingFixture, UserFixture};
use serde::Serialize;

pub const USERS: &[UserFixture] = &[
    UserFixture { username: "super_sam", password: "Super1!", role: Role::SuperUser },
    UserFixture { username: "rockPigeonLover41", password: "Bird1!", role: Role::BasicUser },
    UserFixture { username: "taylor_b", password: "Bird1!", role: Role::BasicUser },
    UserFixture { username: "jordanlee2", password: "Bird1!", role: Role::BasicUser },
    UserFixture { username: "camila_ro", password: "Bird1!", role: Role::BasicUser },
    UserFixture { username: "owl_at_dawn", password: "Bird1!", role: Role::BasicUser },
];

pub const BIRDS: &[BirdFixture] = &[
    BirdFixture { common_name: "Mallard", scientific_name: "Anas platyrhynchos" },
    BirdFixture { common_name: "Bald Eagle", scientific_name: "Haliaeetus leucocephalus" },
    BirdFixture { common_name: "Great Blue Heron", scientific_name: "Ardea herodias" },
    BirdFixture { common_name: "Northern Cardinal", scientific_name: "Cardinalis cardinalis" },
    BirdFixture { common_name: "Blue Jay", scientific_name: "Cyanocitta cristata" },
    BirdFixture { common_name: "American Robin", scientific_name: "Turdus migratorius" },
    BirdFixture { common_name: "Rock Pigeon", scientific_name: "Columba livia" },
    BirdFixture { common_name: "Mourning Dove", scientific_name: "Zenaida macroura" },
    BirdFixture { common_name: "Red-tailed Hawk", scientific_name: "Buteo jamaicensis" },
    BirdFixture { common_name: "Barred Owl", scientific_name: "Strix varia" },
];

pub const GROUPS: &[GroupFixture] = &[
    GroupFixture {
        name: "DFW Birders",
        description: "Sightings and meetups around Dallas-Fort Worth.",
        owner: "admin_alice",
    },
    GroupFixture {
        name: "Coastal Bird Committee",
        description: "Shorebirds, waders and boardwalk reports from the coast.",
        owner: "super_sam",
    },
    GroupFixture {
        name: "Hill Country Spotters",
        description: "Backyard feeders and trail finds in the Texas Hill Country.",
        owner: "admin_alice",
    },
    GroupFixture {
        name: "Gulf Coast Birding",
        description: "Migration watch along the Gulf.",
        owner: "super_sam",
    },
    GroupFixture {
        name: "Metro Birdwatchers",
        description: "City parks, rivers and rooftops.",
        owner: "admin_alice",
    },
];

pub const SIGHTINGS: &[SightingFixture] = &[
    SightingFixture {
        author: "rockPigeonLover41",
        bird: "Rock Pigeon",
        group: "DFW Birders",
        header: "Morning sighting at White Rock Lake",
        text_body: "Caught a small flock skimming the water just after sunrise. The light was perfect!",
        latitude: 32.8256,
        longitude: -96.7166,
    },
    SightingFixture {
        author: "taylor_b",
        bird: "Bald Eagle",
        group: "Metro Birdwatchers",
        header: "Soaring over Trinity River",
        text_body: "Gliding circles above the treeline for several minutes. Surprised to see it so close to the city.",
        latitude: 32.8145,
        longitude: -96.7459,
    },
    SightingFixture {
        author: "jordanlee2",
        bird: "Great Blue Heron",
        group: "Coastal Bird Committee",
        header: "Calm morning at the Aransas boardwalk",
        text_body: "Calm morning, glassy water. Great views and behavior notes. Feeding method was easy to observe.",
        latitude: 28.0206,
        longitude: -96.9903,
    },
    SightingFixture {
        author: "camila_ro",
        bird: "Northern Cardinal",
        group: "Hill Country Spotters",
        header: "Backyard visitor",
        text_body: "Bright red male visited the feeder this morning. Always a beautiful sight!",
        latitude: 30.2649,
        longitude: -97.7733,
    },
    SightingFixture {
        author: "owl_at_dawn",
        bird: "Barred Owl",
        group: "DFW Birders",
        header: "Surprise at Brazos Bend",
        text_body: "Wasn't expecting to see this species here today. Stayed still and it lingered for a good five minutes.",
        latitude: 29.3928,
        longitude: -95.6083,
    },
];

/// Remote image for a bird, served through Wikimedia's file redirect
pub fn bird_image_url(common_name: &str) -> String {
    let file_name = common_name.replace(' ', "_").replace('\'', "");
    format!("{WIKIMEDIA_FILE_PATH}/{file_name}.jpg?width=600")
}

/// The whole data set, as printed by the `fixtures` command
#[derive(Debug, Serialize)]
pub struct FixtureSet {
    pub users: &'static [UserFixture],
    pub birds: &'static [BirdFixture],
    pub groups: &'static [GroupFixture],
    pub sightings: &'static [SightingFixture],
}

pub fn all() -> FixtureSet {
    FixtureSet {
        users: USERS,
        birds: BIRDS,
        groups: GROUPS,
        sightings: SIGHTINGS,
    }
}
