//! Generic named-hook primitive.
//!
//! A `HookSet` stores ordered callbacks registered under "pre" or "post"
//! roles for a named key. Callers execute them in registration order when
//! the key is invoked. The filter layer sits on top of this and adds its
//! own error-short-circuit semantics.

use std::collections::HashMap;

/// Ordered pre/post callbacks keyed by name.
#[derive(Debug, Clone)]
pub struct HookSet<C> {
    pre: HashMap<String, Vec<C>>,
    post: HashMap<String, Vec<C>>,
}

impl<C> Default for HookSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> HookSet<C> {
    pub fn new() -> Self {
        Self {
            pre: HashMap::new(),
            post: HashMap::new(),
        }
    }

    /// Register a callback to run before `key` is invoked.
    pub fn pre(&mut self, key: &str, callback: C) {
        self.pre.entry(key.to_string()).or_default().push(callback);
    }

    /// Register a callback to run after `key` is invoked.
    pub fn post(&mut self, key: &str, callback: C) {
        self.post.entry(key.to_string()).or_default().push(callback);
    }

    /// Callbacks registered under the pre role for `key`, in registration order.
    pub fn pre_callbacks(&self, key: &str) -> &[C] {
        self.pre.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Callbacks registered under the post role for `key`, in registration order.
    pub fn post_callbacks(&self, key: &str) -> &[C] {
        self.post.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }
}
