//! Catalog management service

use crate::{
    error::AppResult,
    models::{
        title::{CreateTitle, UpdateTitle, DEFAULT_COPIES},
        InventoryLine, Title,
    },
    repository::Repository,
};

/// Titles seeded into an empty catalog
pub const DEMO_TITLES: [(&str, &str); 5] = [
    ("The Shawshank Redemption", "Drama"),
    ("The Godfather", "Crime"),
    ("The Dark Knight", "Action"),
    ("Inception", "Sci-Fi"),
    ("Pulp Fiction", "Crime"),
];

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All titles, by name
    pub async fn list_titles(&self) -> AppResult<Vec<Title>> {
        self.repository.titles_list().await
    }

    pub async fn get_title(&self, id: i64) -> AppResult<Title> {
        self.repository.titles_get(id).await
    }

    /// Add a title stocked with the default number of copies
    pub async fn add_title(&self, title: CreateTitle) -> AppResult<Title> {
        let (name, genre) = title.into_parts()?;
        let created = self.repository.titles_create(&name, &genre, DEFAULT_COPIES).await?;
        tracing::info!("Catalog: added title id={} \"{}\"", created.id, created.name);
        Ok(created)
    }

    /// Edit name and genre, optionally overriding the shelf count
    pub async fn edit_title(&self, id: i64, title: UpdateTitle) -> AppResult<Title> {
        let changes = title.into_changes()?;
        let updated = self.repository.titles_update(id, &changes).await?;
        if let Some(copies) = changes.available_copies {
            tracing::info!(
                "Catalog: title id={} restocked to {} available ({} owned)",
                id, copies, updated.max_copies
            );
        }
        Ok(updated)
    }

    /// Remove a title together with all of its rentals
    pub async fn remove_title(&self, id: i64) -> AppResult<()> {
        let rentals = self.repository.titles_delete(id).await?;
        tracing::info!("Catalog: removed title id={} and {} rental(s)", id, rentals);
        Ok(())
    }

    /// Inventory balance per title
    pub async fn inventory(&self) -> AppResult<Vec<InventoryLine>> {
        let lines = self.repository.titles_inventory().await?;
        for line in lines.iter().filter(|line| !line.is_balanced()) {
            tracing::warn!(
                "Inventory out of balance for title id={}: {} available + {} rented != {} owned",
                line.title_id, line.available_copies, line.open_rentals, line.max_copies
            );
        }
        Ok(lines)
    }

    /// Stock the demo titles if the catalog is empty
    pub async fn seed_demo_titles(&self) -> AppResult<usize> {
        if self.repository.titles_count().await? > 0 {
            return Ok(0);
        }
        for (name, genre) in DEMO_TITLES {
            self.repository.titles_create(name, genre, DEFAULT_COPIES).await?;
        }
        tracing::info!("Catalog: seeded {} demo titles", DEMO_TITLES.len());
        Ok(DEMO_TITLES.len())
    }
}
