//! Per-session dashboard layout
//!
//! In-memory only; a restart brings every session back to the default
//! arrangement.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::LayoutError;
use crate::models::{default_layout, LayoutItem, GRID_COLUMNS};

#[derive(Debug, Clone, Default)]
pub struct LayoutStore {
    sessions: Arc<RwLock<HashMap<String, Vec<LayoutItem>>>>,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current layout for the session; sessions that never saved get the default
    pub async fn load(&self, session: &str) -> Vec<LayoutItem> {
        self.sessions
            .read()
            .await
            .get(session)
            .cloned()
            .unwrap_or_else(default_layout)
    }

    /// Replace the whole layout after a drag or resize
    pub async fn save(
        &self,
        session: &str,
        layout: Vec<LayoutItem>,
    ) -> Result<Vec<LayoutItem>, LayoutError> {
        validate_layout(&layout)?;
        self.sessions
            .write()
            .await
            .insert(session.to_string(), layout.clone());
        log::debug!("session {} saved layout with {} item(s)", session, layout.len());
        Ok(layout)
    }

    /// Back to the default arrangement by forgetting the saved one
    pub async fn reset(&self, session: &str) -> Vec<LayoutItem> {
        self.sessions.write().await.remove(session);
        default_layout()
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub fn validate_layout(items: &[LayoutItem]) -> Result<(), LayoutError> {
    if items.is_empty() {
        return Err(LayoutError::Empty);
    }

    let mut seen = HashSet::new();
    for item in items {
        if item.key.trim().is_empty() {
            return Err(LayoutError::EmptyKey);
        }
        if !seen.insert(item.key.as_str()) {
            return Err(LayoutError::DuplicateKey(item.key.clone()));
        }
        if item.width == 0 || item.height == 0 {
            return Err(LayoutError::ZeroSize(item.key.clone()));
        }
        if item.x.saturating_add(item.width) > GRID_COLUMNS {
            return Err(LayoutError::OutOfBounds {
                key: item.key.clone(),
                columns: GRID_COLUMNS,
            });
        }
    }
    Ok(())
}
