use tracing::{info, warn};
use crate::catalog::domain::Catalog;
use crate::patrons::domain::Patron;

// Login holds at most one session, remembered by patron id and resolved against the
// catalog that issued it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Login {
    current_patron: Option<String>,
}

impl Login {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login<'a>(&mut self, catalog: &'a Catalog, patron_id: &str, password: &str) -> Option<&'a Patron> {
        match catalog.get_patron(patron_id) {
            Some(patron) if patron.verify_password(password) => {
                info!(patron_id, "patron logged in");
                self.current_patron = Some(patron.patron_id.to_string());
                Some(patron)
            }
            _ => {
                warn!(patron_id, "login rejected");
                None
            }
        }
    }

    pub fn logout(&mut self) {
        self.current_patron = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_patron.is_some()
    }

    pub fn current_patron_id(&self) -> Option<&str> {
        self.current_patron.as_deref()
    }

    pub fn current_patron<'a>(&self, catalog: &'a Catalog) -> Option<&'a Patron> {
        self.current_patron.as_deref().and_then(|patron_id| catalog.get_patron(patron_id))
    }

    pub fn status(&self, catalog: &Catalog) -> String {
        match self.current_patron(catalog) {
            Some(patron) => format!("{} logged in.", patron.name),
            None => "No one logged".to_string(),
        }
    }
}
