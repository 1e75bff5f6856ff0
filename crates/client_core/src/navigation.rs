use shared::domain::AccountId;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    AccountList,
    NewAccount,
    EditAccount(AccountId),
}

impl Route {
    /// Maps a path to a route. Unknown paths fall back to the account list.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["accounts", "new"] => Self::NewAccount,
            ["accounts", "edit", id] => id
                .parse::<i64>()
                .map(|id| Self::EditAccount(AccountId(id)))
                .unwrap_or(Self::AccountList),
            _ => Self::AccountList,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::AccountList => "/accounts".to_string(),
            Self::NewAccount => "/accounts/new".to_string(),
            Self::EditAccount(id) => format!("/accounts/edit/{}", id.0),
        }
    }

    /// The id a form activated on this route should edit, if any.
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::EditAccount(id) => Some(*id),
            _ => None,
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl Navigator for mpsc::UnboundedSender<Route> {
    fn navigate(&self, route: Route) {
        debug!(path = %route.path(), "navigating");
        if self.send(route).is_err() {
            debug!(path = %route.path(), "navigation dropped; no shell is listening");
        }
    }
}
