use crate::blog::SessionID;
use crate::store::{FsStore, PostStore};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod session;

pub type SharedState = axum::extract::State<Arc<State>>;
pub type NestedRouter = axum::Router<Arc<State>>;

#[derive(Debug)]
pub struct State {
    pub data_dir: PathBuf,
    pub posts: Box<dyn PostStore>,
    pub sessions: RwLock<HashMap<SessionID, session::Session>>,
}

impl State {
    pub fn new(data_dir: impl Into<PathBuf>) -> State {
        let data_dir = data_dir.into();

        State {
            posts: Box::new(FsStore::new(data_dir.join("post"))),
            data_dir,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}
