//! Account schema for the single dashboard owner (and anyone else added
//! through the `user` binary)

use serde::{Serialize, Deserialize};

pub type UserId = str;

#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub id: String
}
