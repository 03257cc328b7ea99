use serde::{Deserialize, Serialize};

/// Offset/limit of the page a controller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn first(limit: u64) -> Self {
        Self { skip: 0, limit }
    }

    pub fn next(self) -> Self {
        Self {
            skip: self.skip.saturating_add(self.limit),
            ..self
        }
    }

    /// Clamped at zero.
    pub fn prev(self) -> Self {
        Self {
            skip: self.skip.saturating_sub(self.limit),
            ..self
        }
    }
}

/// One fetched page of an ordered result set.
///
/// Always built through [`PageWindow::new`], so `has_next == skip + limit < total`
/// and `has_prev == skip > 0` hold regardless of what the server claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageWindow {
    pub fn new(skip: u64, limit: u64, total: u64) -> Self {
        Self {
            skip,
            limit,
            total,
            has_next: skip.saturating_add(limit) < total,
            has_prev: skip > 0,
        }
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

/// Wire shape of list endpoints: the paginated envelope, or a bare array from
/// backends that ignore `skip`/`limit`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Envelope {
        items: Vec<T>,
        #[serde(default)]
        skip: Option<u64>,
        #[serde(default)]
        limit: Option<u64>,
        total: u64,
        #[serde(default)]
        has_next: Option<bool>,
        #[serde(default)]
        has_prev: Option<bool>,
    },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub fn into_page(self, requested: PageRequest) -> Page<T> {
        match self {
            ListBody::Envelope {
                items,
                skip,
                limit,
                total,
                has_next,
                has_prev,
            } => {
                let window = PageWindow::new(
                    skip.unwrap_or(requested.skip),
                    limit.unwrap_or(requested.limit),
                    total,
                );
                if has_next.is_some_and(|v| v != window.has_next)
                    || has_prev.is_some_and(|v| v != window.has_prev)
                {
                    tracing::warn!(
                        skip = window.skip,
                        limit = window.limit,
                        total = window.total,
                        server_has_next = ?has_next,
                        server_has_prev = ?has_prev,
                        "Server page flags disagree with window; using computed flags"
                    );
                }
                Page { items, window }
            }
            ListBody::Bare(all) => {
                let total = all.len() as u64;
                let items = all
                    .into_iter()
                    .skip(requested.skip as usize)
                    .take(requested.limit as usize)
                    .collect();
                Page {
                    items,
                    window: PageWindow::new(requested.skip, requested.limit, total),
                }
            }
        }
    }
}
