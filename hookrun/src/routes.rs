//! Route table: exact-match mapping from URL path to a configured action.
//!
//! Built once at startup from the config's route list and shared immutably
//! (behind an `Arc`) by every request task. Registration is single-threaded
//! startup work; lookups never mutate.

use std::collections::HashMap;

use crate::config::RouteConfig;

/// One registered webhook action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The exact URL path this action is registered under
    pub path: String,

    /// Filesystem path of the script to run
    pub command: String,
}

/// Exact-match path → action mapping.
///
/// No prefix or pattern matching: the action resolved for a request is always
/// the one whose registered path equals the request path byte-for-byte.
#[derive(Debug, Default)]
pub struct RouteTable {
    actions: HashMap<String, Action>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the configured route list, in order.
    ///
    /// A duplicate path overwrites the earlier registration (last wins).
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut table = Self::new();
        for route in routes {
            table.register(&route.path, &route.command);
        }
        table
    }

    /// Insert or overwrite the action for `path`.
    ///
    /// The command is not checked for executability here; a broken command
    /// surfaces as an execution failure at request time.
    pub fn register(&mut self, path: &str, command: &str) {
        self.actions.insert(
            path.to_string(),
            Action {
                path: path.to_string(),
                command: command.to_string(),
            },
        );
    }

    /// Exact-match lookup.
    pub fn resolve(&self, path: &str) -> Option<&Action> {
        self.actions.get(path)
    }

    /// All registered paths, for wiring up the HTTP router.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
