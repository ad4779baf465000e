//! Seed data for `--dev` runs.

use admin_core::{AdminProfile, SessionRecord, SettingsId, TeamSettings};
use serde_json::json;

pub fn sessions() -> Vec<SessionRecord> {
    let seeds = [
        json!({
            "id": "1",
            "title": "Rust Ownership Deep Dive",
            "technology": "Rust",
            "date": "2024-03-12",
            "time": "10:00",
            "location": "Room 4",
            "maxAttendees": 24,
            "difficulty": "Intermediate",
            "type": "PROJECT_BASED",
            "currentStatus": "In_Progress",
            "description": "Borrowing, lifetimes and smart pointers by building a small cache."
        }),
        json!({
            "id": "2",
            "title": "Shipping a Product API",
            "technology": "TypeScript",
            "date": "2024-04-02",
            "time": "14:30",
            "location": "Auditorium",
            "maxAttendees": 80,
            "difficulty": "Beginner",
            "type": "PRODUCT_BASED",
            "currentStatus": "On_Hold",
            "description": "From schema to deployed service in one afternoon."
        }),
    ];
    seeds
        .into_iter()
        .map(|seed| serde_json::from_value(seed).expect("dev seed is a valid session"))
        .collect()
}

pub fn profile() -> AdminProfile {
    AdminProfile {
        id: Some(SettingsId::new("dev")),
        name: "Dev Admin".to_string(),
        email: "admin@localhost".to_string(),
        department: "Learning".to_string(),
        ..AdminProfile::default()
    }
}

pub fn team_settings() -> Vec<TeamSettings> {
    vec![TeamSettings {
        id: Some(SettingsId::new("dev-team")),
        ..TeamSettings::default()
    }]
}
