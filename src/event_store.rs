//! Event data store collaborator
//!
//! The RSVP/organization/stats/bond tables behind the event site's request
//! handlers, kept as typed JSON payloads over an in-memory store. This is a
//! leaf next to the game core: simple inserts and selects, no cross-table
//! transactions. The 50-row RSVP cap is checked before insert; a single
//! store instance is mutated from one place at a time, so the
//! check-then-insert pair cannot race in-process.

use serde::{Deserialize, Serialize};

/// Free RSVP cap for the event
pub const RSVP_LIMIT: usize = 50;

/// Default fundraising goal when no bond row has been written
pub const DEFAULT_BOND_GOAL: f64 = 75_000.0;

/// Default reef-building goal for the stats dashboard
pub const DEFAULT_REEF_GOAL: u32 = 100;

/// Store failures, serialized as the `{"error": ...}` envelope the site's
/// handlers return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Malformed request body (client error)
    Validation(&'static str),
    /// The free RSVP cap has been reached
    RsvpLimitReached,
    /// Referenced row does not exist
    NotFound,
}

impl StoreError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            StoreError::Validation(msg) => msg,
            StoreError::RsvpLimitReached => {
                "Sorry, the free RSVP limit of 50 has been reached. \
                 Please check back later for updates."
            }
            StoreError::NotFound => "Record not found",
        }
    }

    /// JSON error envelope
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.message() }).to_string()
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for StoreError {}

/// Incoming RSVP submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpRequest {
    pub wallet_address: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub donation_amount: Option<f64>,
    pub get_wristband: Option<bool>,
}

/// A stored RSVP row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub id: u32,
    pub wallet_address: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub donation_amount: f64,
    pub get_wristband: bool,
}

/// Organization verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgStatus {
    Pending,
    Verified,
    Rejected,
}

/// Incoming organization submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationRequest {
    pub name: String,
    pub focus_area: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub wallet_address: Option<String>,
    pub impact_description: Option<String>,
    pub proof_links: Option<String>,
}

/// A stored organization row. New submissions always start pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: u32,
    pub name: String,
    pub focus_area: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub wallet_address: Option<String>,
    pub status: OrgStatus,
    pub impact_description: Option<String>,
    pub proof_links: Option<String>,
}

/// Aggregate counters for the stats dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub rsvp_count: usize,
    pub total_donations: f64,
    pub donor_count: usize,
    pub verified_orgs: usize,
    pub reefs_built: u32,
    pub reef_goal: u32,
}

/// Single-row fundraising status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondStatus {
    pub raised: f64,
    pub goal: f64,
}

impl Default for BondStatus {
    fn default() -> Self {
        Self {
            raised: 0.0,
            goal: DEFAULT_BOND_GOAL,
        }
    }
}

/// In-memory event store
#[derive(Debug, Clone)]
pub struct EventStore {
    rsvps: Vec<RsvpRecord>,
    organizations: Vec<Organization>,
    bond: Option<BondStatus>,
    reefs_built: u32,
    reef_goal: u32,
    next_id: u32,
}

impl Default for EventStore {
    fn default() -> Self {
        Self {
            rsvps: Vec::new(),
            organizations: Vec::new(),
            bond: None,
            reefs_built: 0,
            reef_goal: DEFAULT_REEF_GOAL,
            next_id: 0,
        }
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Create an RSVP. Requires a name (plus optional email) or a wallet
    /// address, and rejects once the free cap is reached - the cap check
    /// happens before anything is written.
    pub fn create_rsvp(&mut self, req: RsvpRequest) -> Result<u32, StoreError> {
        if req.name.is_none() && req.wallet_address.is_none() {
            return Err(StoreError::Validation(
                "Either name/email or wallet_address required",
            ));
        }
        if self.rsvps.len() >= RSVP_LIMIT {
            return Err(StoreError::RsvpLimitReached);
        }

        let id = self.next_id();
        self.rsvps.push(RsvpRecord {
            id,
            wallet_address: req.wallet_address,
            name: req.name,
            email: req.email,
            donation_amount: req.donation_amount.unwrap_or(0.0),
            get_wristband: req.get_wristband.unwrap_or(false),
        });
        Ok(id)
    }

    pub fn rsvp_count(&self) -> usize {
        self.rsvps.len()
    }

    /// List organizations, optionally filtered by status, newest first
    pub fn organizations(&self, status: Option<OrgStatus>) -> Vec<&Organization> {
        self.organizations
            .iter()
            .rev()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect()
    }

    /// Submit an organization for verification (starts pending)
    pub fn create_organization(&mut self, req: OrganizationRequest) -> Result<u32, StoreError> {
        if req.name.is_empty() || req.focus_area.is_empty() {
            return Err(StoreError::Validation("Name and focus area are required"));
        }

        let id = self.next_id();
        self.organizations.push(Organization {
            id,
            name: req.name,
            focus_area: req.focus_area,
            website: req.website,
            contact_email: req.contact_email,
            wallet_address: req.wallet_address,
            status: OrgStatus::Pending,
            impact_description: req.impact_description,
            proof_links: req.proof_links,
        });
        Ok(id)
    }

    /// Admin status update
    pub fn set_organization_status(
        &mut self,
        id: u32,
        status: OrgStatus,
    ) -> Result<(), StoreError> {
        let org = self
            .organizations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        org.status = status;
        Ok(())
    }

    /// Aggregate counts and sums over the RSVP and organization tables
    pub fn stats(&self) -> EventStats {
        let total_donations: f64 = self.rsvps.iter().map(|r| r.donation_amount).sum();
        let mut donors: Vec<&str> = self
            .rsvps
            .iter()
            .filter(|r| r.donation_amount > 0.0)
            .filter_map(|r| r.wallet_address.as_deref())
            .collect();
        donors.sort_unstable();
        donors.dedup();

        EventStats {
            rsvp_count: self.rsvps.len(),
            total_donations,
            donor_count: donors.len(),
            verified_orgs: self
                .organizations
                .iter()
                .filter(|o| o.status == OrgStatus::Verified)
                .count(),
            reefs_built: self.reefs_built,
            reef_goal: self.reef_goal,
        }
    }

    /// Bump the reef-building counter
    pub fn record_reef_built(&mut self) {
        self.reefs_built += 1;
    }

    pub fn set_reef_goal(&mut self, goal: u32) {
        self.reef_goal = goal;
    }

    /// Current fundraising status (defaults when no row has been written)
    pub fn bond_status(&self) -> BondStatus {
        self.bond.unwrap_or_default()
    }

    pub fn set_bond_status(&mut self, bond: BondStatus) {
        self.bond = Some(bond);
    }
}
