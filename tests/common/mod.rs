//! Shared fixtures for integration tests

#![allow(dead_code)]

use movie_rental_server::{
    config::AuthConfig,
    models::{
        renter::NewRenter,
        title::{CreateTitle, UpdateTitle},
        Role, Title,
    },
    repository::{Repository, SqliteStore},
    services::Services,
};

/// Services over a fresh in-memory SQLite store
pub async fn services() -> Services {
    let store = SqliteStore::in_memory().await.expect("in-memory store");
    Services::new(Repository::new(store), AuthConfig::default())
}

/// Insert a renter directly, skipping password hashing
pub async fn renter(services: &Services, handle: &str) -> i64 {
    services
        .repository
        .renters_create(&NewRenter {
            handle: handle.to_string(),
            credential_hash: "unused".to_string(),
            role: Role::User,
        })
        .await
        .expect("create renter")
        .id
}

pub async fn title(services: &Services, name: &str, genre: &str) -> Title {
    services
        .catalog
        .add_title(CreateTitle {
            name: name.to_string(),
            genre: genre.to_string(),
        })
        .await
        .expect("add title")
}

/// Set the shelf count of a title, keeping its name and genre
pub async fn restock(services: &Services, title: &Title, copies: i32) -> Title {
    services
        .catalog
        .edit_title(
            title.id,
            UpdateTitle {
                name: title.name.clone(),
                genre: title.genre.clone(),
                available_copies: Some(copies.into()),
            },
        )
        .await
        .expect("restock title")
}

pub async fn available(services: &Services, title_id: i64) -> i32 {
    services
        .catalog
        .get_title(title_id)
        .await
        .expect("title")
        .available_copies
}

/// Every title balances open rentals against owned copies
pub async fn assert_inventory_balanced(services: &Services) {
    for line in services.catalog.inventory().await.expect("inventory") {
        assert!(line.is_balanced(), "unbalanced inventory: {:?}", line);
    }
}
