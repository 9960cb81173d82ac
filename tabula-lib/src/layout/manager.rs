//! Layout manager with write-through persistence

use std::sync::Arc;

use super::ColumnLayout;
use crate::config::GridConfig;
use crate::model::ColumnDef;
use crate::store::LayoutStore;

/// Lifecycle of a [`LayoutManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    /// Holding the default layout; nothing read yet.
    #[default]
    Uninitialized,
    /// Holding the layout read from the store, or the default if there was
    /// none.
    Loaded,
    /// Changed since load; every change has been written.
    Mutated,
    /// Restored to the default and the stored record deleted.
    Reset,
}

/// Owns the column order and widths of one grid.
///
/// The manager starts from the column set's default order. [`load`] replaces
/// it with the stored layout if one exists and is readable. Each change
/// writes the full record once; a failed write is logged and the in-memory
/// layout is kept. Managers sharing a key overwrite each other, last write
/// wins.
///
/// [`load`]: LayoutManager::load
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tabula_lib::layout::LayoutManager;
/// use tabula_lib::store::MemoryStore;
///
/// let store = Arc::new(MemoryStore::new());
/// let mut layout = LayoutManager::new("orders-grid", ["id", "name", "amount"], store);
/// layout.load().await;
///
/// layout.resize("name", -500).await;
/// assert_eq!(layout.width("name"), 50);
///
/// layout.reorder("amount", "id").await;
/// assert_eq!(layout.order(), ["amount", "id", "name"]);
/// ```
pub struct LayoutManager {
    key: String,
    store: Arc<dyn LayoutStore>,
    default_order: Vec<String>,
    min_width: u32,
    default_width: u32,
    layout: ColumnLayout,
    phase: LayoutPhase,
}

impl LayoutManager {
    /// Creates a manager for `key` over the given default column order.
    pub fn new<S: Into<String>>(
        key: impl Into<String>,
        default_order: impl IntoIterator<Item = S>,
        store: Arc<dyn LayoutStore>,
    ) -> Self {
        let default_order: Vec<String> = default_order.into_iter().map(Into::into).collect();
        let config = GridConfig::default();
        Self {
            key: key.into(),
            store,
            layout: ColumnLayout::with_order(default_order.iter().cloned()),
            default_order,
            min_width: config.min_column_width,
            default_width: config.default_column_width,
            phase: LayoutPhase::Uninitialized,
        }
    }

    /// Creates a manager whose default order is the order of `columns`.
    pub fn for_columns<R>(key: impl Into<String>, columns: &[ColumnDef<R>], store: Arc<dyn LayoutStore>) -> Self {
        Self::new(key, columns.iter().map(|c| c.id.clone()), store)
    }

    /// Takes the width limits from `config`.
    pub fn with_config(mut self, config: &GridConfig) -> Self {
        self.min_width = config.min_column_width;
        self.default_width = config.default_column_width;
        self
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the current phase.
    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Returns the current layout.
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Returns the column ids, left to right.
    pub fn order(&self) -> &[String] {
        &self.layout.order
    }

    /// Returns the width of a column: its explicit width, or the default.
    pub fn width(&self, column_id: &str) -> u32 {
        self.layout
            .widths
            .get(column_id)
            .copied()
            .unwrap_or(self.default_width)
    }

    /// Returns the smallest allowed width.
    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Reads the stored layout.
    ///
    /// A missing, unreadable or malformed record leaves the default layout
    /// in place. A stored layout is reconciled with the current columns.
    pub async fn load(&mut self) -> &ColumnLayout {
        let default = ColumnLayout::with_order(self.default_order.iter().cloned());

        self.layout = match self.store.get_bytes(&self.key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<ColumnLayout>(&bytes) {
                Ok(stored) => stored.reconcile(&self.default_order, self.min_width),
                Err(e) => {
                    log::warn!("ignoring malformed layout {:?}: {}", self.key, e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                log::warn!("failed to read layout {:?}: {}", self.key, e);
                default
            }
        };

        self.phase = LayoutPhase::Loaded;
        &self.layout
    }

    /// Changes a column's width by `delta` pixels, never going below the
    /// minimum width.
    ///
    /// Returns the new width, or `None` for an unknown column.
    pub async fn resize(&mut self, column_id: &str, delta: i32) -> Option<u32> {
        if self.layout.position(column_id).is_none() {
            log::debug!("resize ignored: unknown column {:?}", column_id);
            return None;
        }

        let current = i64::from(self.width(column_id));
        let target = (current + i64::from(delta)).clamp(i64::from(self.min_width), i64::from(u32::MAX));
        let width = u32::try_from(target).unwrap_or(u32::MAX);

        self.layout.widths.insert(column_id.to_string(), width);
        self.commit().await;
        Some(width)
    }

    /// Moves `dragged` to the position currently held by `target`.
    ///
    /// Returns `false` without writing if either column is unknown or they
    /// are the same column.
    pub async fn reorder(&mut self, dragged: &str, target: &str) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.layout.position(dragged), self.layout.position(target)) else {
            log::debug!("reorder ignored: {:?} onto {:?}", dragged, target);
            return false;
        };

        let id = self.layout.order.remove(from);
        self.layout.order.insert(to, id);
        self.commit().await;
        true
    }

    /// Moves a column to `index`, clamped to the last position.
    ///
    /// Returns `false` without writing if the column is unknown or already
    /// there.
    pub async fn move_to(&mut self, column_id: &str, index: usize) -> bool {
        let Some(from) = self.layout.position(column_id) else {
            log::debug!("move ignored: unknown column {:?}", column_id);
            return false;
        };

        let to = index.min(self.layout.order.len() - 1);
        if from == to {
            return false;
        }

        let id = self.layout.order.remove(from);
        self.layout.order.insert(to, id);
        self.commit().await;
        true
    }

    /// Restores the default order, clears explicit widths and deletes the
    /// stored record.
    pub async fn reset(&mut self) {
        self.layout = ColumnLayout::with_order(self.default_order.iter().cloned());
        if let Err(e) = self.store.delete(&self.key).await {
            log::warn!("failed to delete layout {:?}: {}", self.key, e);
        }
        self.phase = LayoutPhase::Reset;
    }

    async fn commit(&mut self) {
        self.phase = LayoutPhase::Mutated;

        let bytes = match serde_json::to_vec(&self.layout) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("failed to encode layout {:?}: {}", self.key, e);
                return;
            }
        };
        if let Err(e) = self.store.set_bytes(&self.key, bytes).await {
            log::warn!("failed to write layout {:?}: {}", self.key, e);
        }
    }
}

impl std::fmt::Debug for LayoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutManager")
            .field("key", &self.key)
            .field("layout", &self.layout)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
