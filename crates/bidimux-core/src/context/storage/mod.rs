//! Storage of all live browsing contexts.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::browsing_context::Info;

use super::BrowsingContext;

/// Owner of every live [`BrowsingContext`], keyed by context id.
#[derive(Debug, Default)]
pub struct BrowsingContextStorage {
    contexts: Mutex<HashMap<String, Arc<BrowsingContext>>>,
}

impl BrowsingContextStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context and link it to its parent.
    pub async fn add_context(&self, context: Arc<BrowsingContext>) {
        let parent = context.parent_id().map(str::to_string);
        {
            let mut contexts = self.contexts.lock().await;
            contexts.insert(context.id().to_string(), context.clone());
        }
        if let Some(parent_id) = parent {
            if let Ok(parent) = self.get(&parent_id).await {
                parent.add_child(context.id()).await;
            }
        }
        debug!(context = %context.id(), "Context registered");
    }

    /// Whether a context with this id is known.
    pub async fn has_context(&self, context_id: &str) -> bool {
        self.contexts.lock().await.contains_key(context_id)
    }

    /// Look a context up.
    ///
    /// # Errors
    ///
    /// `no such frame` when the id is unknown.
    pub async fn get(&self, context_id: &str) -> Result<Arc<BrowsingContext>> {
        self.contexts.lock().await.get(context_id).cloned().ok_or_else(|| {
            Error::new(
                ErrorCode::NoSuchFrame,
                format!("Context '{context_id}' not found"),
            )
        })
    }

    /// Look a top-level context up.
    ///
    /// # Errors
    ///
    /// `no such frame` for unknown ids, `invalid argument` for child
    /// contexts where a top-level traversable is required.
    pub async fn get_top_level(&self, context_id: &str) -> Result<Arc<BrowsingContext>> {
        let context = self.get(context_id).await?;
        if !context.is_top_level() {
            return Err(Error::invalid_argument(format!(
                "Context '{context_id}' is not a top-level browsing context"
            )));
        }
        Ok(context)
    }

    /// The top-level ancestor of a context.
    pub async fn top_level_ancestor(&self, context_id: &str) -> Result<Arc<BrowsingContext>> {
        let context = self.get(context_id).await?;
        self.get(context.top_level_id()).await
    }

    /// All live contexts.
    pub async fn all(&self) -> Vec<Arc<BrowsingContext>> {
        self.contexts.lock().await.values().cloned().collect()
    }

    /// All top-level contexts.
    pub async fn top_level_contexts(&self) -> Vec<Arc<BrowsingContext>> {
        self.contexts
            .lock()
            .await
            .values()
            .filter(|c| c.is_top_level())
            .cloned()
            .collect()
    }

    /// Find the context currently attached to a CDP target id.
    pub async fn find_by_target(&self, target_id: &str) -> Option<Arc<BrowsingContext>> {
        for context in self.all().await {
            if context.target().await.target_id() == target_id {
                return Some(context);
            }
        }
        None
    }

    /// Remove a context and all its descendants.
    ///
    /// Returns the removed contexts children-first, the order in which
    /// `contextDestroyed` must be emitted. Each removed context has its
    /// pending waits cancelled.
    pub async fn delete_context(&self, context_id: &str) -> Vec<Arc<BrowsingContext>> {
        let Ok(context) = self.get(context_id).await else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        self.collect_subtree(&context, &mut removed).await;

        {
            let mut contexts = self.contexts.lock().await;
            for context in &removed {
                contexts.remove(context.id());
            }
        }
        if let Some(parent_id) = context.parent_id() {
            if let Ok(parent) = self.get(parent_id).await {
                parent.remove_child(context.id()).await;
            }
        }

        for context in &removed {
            context.dispose().await;
        }
        debug!(context = %context_id, removed = removed.len(), "Context deleted");
        removed
    }

    /// Depth-first post-order subtree collection (children first).
    async fn collect_subtree(
        &self,
        context: &Arc<BrowsingContext>,
        out: &mut Vec<Arc<BrowsingContext>>,
    ) {
        for child_id in context.children().await {
            if let Ok(child) = self.get(&child_id).await {
                Box::pin(self.collect_subtree(&child, out)).await;
            }
        }
        out.push(context.clone());
    }

    /// Build the client-facing tree rooted at `root`, or at all top-level
    /// contexts.
    ///
    /// `max_depth` of zero reports the roots without children.
    pub async fn get_tree(
        &self,
        max_depth: Option<u64>,
        root: Option<&str>,
    ) -> Result<Vec<Info>> {
        let roots = match root {
            Some(id) => vec![self.get(id).await?],
            None => {
                let mut tops = self.top_level_contexts().await;
                tops.sort_by(|a, b| a.id().cmp(b.id()));
                tops
            }
        };

        let mut infos = Vec::new();
        for context in roots {
            infos.push(self.build_info(&context, max_depth).await);
        }
        Ok(infos)
    }

    async fn build_info(&self, context: &Arc<BrowsingContext>, depth: Option<u64>) -> Info {
        let children = match depth {
            Some(0) => None,
            _ => {
                let next_depth = depth.map(|d| d - 1);
                let mut children = Vec::new();
                for child_id in context.children().await {
                    if let Ok(child) = self.get(&child_id).await {
                        children.push(Box::pin(self.build_info(&child, next_depth)).await);
                    }
                }
                Some(children)
            }
        };

        Info {
            context: context.id().to_string(),
            url: context.url().await,
            user_context: context.user_context().to_string(),
            children,
            parent: context.parent_id().map(str::to_string),
            original_opener: context.original_opener().map(str::to_string),
            client_window: None,
        }
    }
}

#[cfg(test)]
mod tests;
