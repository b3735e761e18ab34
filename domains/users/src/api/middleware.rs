//! Users domain state

use crate::repository::UserDirectory;
use std::sync::Arc;

/// Application state for the Users domain
#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<dyn UserDirectory>,
}
