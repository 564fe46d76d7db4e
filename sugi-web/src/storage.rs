use gloo_storage::{LocalStorage, Storage};
use sugi_client::KvStore;

/// Browser local storage, behind the client crate's store seam
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalKv;

impl KvStore for LocalKv {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        LocalStorage::set(key, value).expect("failed saving to local storage");
    }

    fn remove(&mut self, key: &str) {
        LocalStorage::delete(key);
    }
}
