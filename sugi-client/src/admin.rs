use crate::KvStore;

const KEY_ADMIN_TOKEN: &str = "admin-token";

/// Remembers the admin token across reloads.
///
/// Holding a token only unlocks the admin UI; the server checks the token
/// itself on destructive calls, so a wrong token fails there with a
/// permission error.
#[derive(Debug)]
pub struct AdminMode<S> {
    store: S,
}

impl<S: KvStore> AdminMode<S> {
    pub fn load(store: S) -> AdminMode<S> {
        AdminMode { store }
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(KEY_ADMIN_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn activate(&mut self, token: &str) {
        if !token.is_empty() {
            self.store.set(KEY_ADMIN_TOKEN, token);
        }
    }

    pub fn deactivate(&mut self) {
        self.store.remove(KEY_ADMIN_TOKEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn token_round_trip() {
        let mut admin = AdminMode::load(MemoryStore::new());
        assert!(!admin.is_active());
        admin.activate("sekrit");
        assert!(admin.is_active());
        assert_eq!(admin.token().as_deref(), Some("sekrit"));
        admin.deactivate();
        assert!(!admin.is_active());
    }

    #[test]
    fn empty_token_is_ignored() {
        let mut admin = AdminMode::load(MemoryStore::new());
        admin.activate("");
        assert!(!admin.is_active());
    }
}
