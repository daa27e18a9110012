use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A lobbying firm scraped from the registry, identified by its
/// site-assigned id. Created from a listing row with empty collections;
/// financial activity is attached later by the detail phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub clients: Vec<Client>,
    pub quarters: Vec<Quarter>,
}

/// An entity that paid the firm for lobbying within the session.
/// A `None` amount means the payment cell held a non-numeric placeholder,
/// which must stay distinguishable from a real zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub name: Option<String>,
    pub amount: Option<f64>,
}

/// One quarterly payment total, labelled by the reporting session and the
/// quarter number within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quarter {
    pub session: Option<String>,
    pub quarter: Option<String>,
    pub amount: Option<f64>,
}

/// Financial activity extracted from one firm's detail page.
#[derive(Debug, Clone, Default)]
pub struct FirmActivity {
    pub clients: Vec<Client>,
    pub quarters: Vec<Quarter>,
}

impl Firm {
    pub fn from_listing(id: String, name: String) -> Self {
        Self {
            id: Some(id),
            name: Some(name),
            clients: Vec::new(),
            quarters: Vec::new(),
        }
    }

    /// Attach detail-phase results, sorting both collections so output
    /// order is independent of fetch completion order.
    pub fn attach_activity(&mut self, mut activity: FirmActivity) {
        activity.clients.sort_by(|a, b| a.name.cmp(&b.name));
        activity
            .quarters
            .sort_by(|a, b| a.session.cmp(&b.session).then_with(|| a.quarter.cmp(&b.quarter)));
        self.clients = activity.clients;
        self.quarters = activity.quarters;
    }
}

/// Output ordering of the master firm list: by name, ties broken by id.
pub fn registry_order(a: &Firm, b: &Firm) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
}
