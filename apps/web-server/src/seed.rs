//! Group fixtures loaded at startup.
//!
//! Groups have no creation route; a deployment lists them in a JSON file named
//! by `GROUPS_FIXTURE`:
//!
//! ```json
//! [{ "title": "Cats", "slug": "cats", "description": "All about cats" }]
//! ```

use std::path::Path;

use serde::Deserialize;

use yatube_core::domain::Group;
use yatube_core::error::RepoError;
use yatube_core::ports::GroupRepository;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSeed {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Parse a fixture file.
pub fn load_groups(path: &Path) -> std::io::Result<Vec<GroupSeed>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {e}", path.display()),
        )
    })
}

/// Create every group whose slug is not taken yet. Returns how many were created.
pub async fn seed_groups(
    groups: &dyn GroupRepository,
    seeds: Vec<GroupSeed>,
) -> Result<usize, RepoError> {
    let mut created = 0;
    for seed in seeds {
        if groups.find_by_slug(&seed.slug).await?.is_some() {
            continue;
        }
        let group = groups
            .save(Group::new(seed.title, seed.slug, seed.description))
            .await?;
        tracing::info!(slug = %group.slug, "Group seeded");
        created += 1;
    }
    Ok(created)
}
