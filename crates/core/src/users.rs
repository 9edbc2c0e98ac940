//! Memoized user lookups for verbose rendering.
//!
//! The cache is an explicit value owned by whoever renders a report; it lives for one run
//! and never invalidates entries. Lookups are issued at most once per user id: resolving
//! takes `&mut self`, so two lookups for the same id can never be in flight at once.
//! Failed lookups are not cached and will be retried on the next request for that id.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;

use crate::message::User;

/// Error type for user lookups
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Error while fetching user info for [{user}]. Error: [{error}]")]
    Remote { user: String, error: String },

    #[error("Error while fetching user info for [{user}]: {source}")]
    Transport {
        user: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Resolves a single user id. `Ok(None)` means the user does not exist.
pub trait UserLookup {
    fn lookup(&self, user_id: &str) -> impl Future<Output = Result<Option<User>, LookupError>>;
}

/// How a user key is shown in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDisplay {
    Found {
        name: String,
        real_name: Option<String>,
    },
    NotFound {
        id: String,
    },
}

impl UserDisplay {
    pub fn not_found(id: &str) -> Self {
        UserDisplay::NotFound { id: id.to_string() }
    }
}

impl From<&User> for UserDisplay {
    fn from(user: &User) -> Self {
        UserDisplay::Found {
            name: user.name.clone(),
            real_name: user.real_name.clone(),
        }
    }
}

impl fmt::Display for UserDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserDisplay::Found { name, real_name } => {
                write!(f, "{} ({})", name, real_name.as_deref().unwrap_or_default())
            }
            UserDisplay::NotFound { id } => write!(f, "{id} (!Not Found!)"),
        }
    }
}

pub struct UserCache<L> {
    lookup: L,
    entries: HashMap<String, Option<User>>,
}

impl<L: UserLookup> UserCache<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            entries: HashMap::new(),
        }
    }

    /// Display for `user_id`, calling the lookup only on the first successful request.
    ///
    /// "Not found" answers are cached like any other; errors are returned and not cached.
    pub async fn resolve(&mut self, user_id: &str) -> Result<UserDisplay, LookupError> {
        if let Some(entry) = self.entries.get(user_id) {
            return Ok(display(user_id, entry.as_ref()));
        }

        let user = self.lookup.lookup(user_id).await?;
        let shown = display(user_id, user.as_ref());
        self.entries.insert(user_id.to_string(), user);
        Ok(shown)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn display(user_id: &str, user: Option<&User>) -> UserDisplay {
    match user {
        Some(user) => UserDisplay::from(user),
        None => UserDisplay::not_found(user_id),
    }
}
