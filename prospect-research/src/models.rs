use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of a buyer-discovery request.
///
/// Field names match the research service contract (snake_case on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub company_name: String,
    pub company_website: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
}

/// Profile of the company the research was run for, as echoed back by the
/// service. Every field is opaque text and any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCompanyProfile {
    pub name: Option<String>,
    pub url: Option<String>,
    pub overview: Option<String>,
    pub business_model: Option<String>,
    pub therapeutic_coverage: Option<String>,
}

/// Prospect identifier as the service emits it.
///
/// Curated rows carry numeric ids, research output carries strings such as
/// `"research-3"`. Both forms are accepted, and an integer-like string
/// compares equal to its numeric form, so `"3"` and `3` select the same
/// prospect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuyerId {
    Number(i64),
    Text(String),
}

enum CanonicalId<'a> {
    Number(i64),
    Text(&'a str),
}

impl BuyerId {
    fn canonical(&self) -> CanonicalId<'_> {
        match self {
            BuyerId::Number(n) => CanonicalId::Number(*n),
            BuyerId::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(n) => CanonicalId::Number(n),
                    Err(_) => CanonicalId::Text(trimmed),
                }
            }
        }
    }
}

impl PartialEq for BuyerId {
    fn eq(&self, other: &Self) -> bool {
        match (self.canonical(), other.canonical()) {
            (CanonicalId::Number(a), CanonicalId::Number(b)) => a == b,
            (CanonicalId::Text(a), CanonicalId::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for BuyerId {}

impl From<i64> for BuyerId {
    fn from(n: i64) -> Self {
        BuyerId::Number(n)
    }
}

impl From<&str> for BuyerId {
    fn from(s: &str) -> Self {
        BuyerId::Text(s.to_string())
    }
}

impl From<String> for BuyerId {
    fn from(s: String) -> Self {
        BuyerId::Text(s)
    }
}

impl fmt::Display for BuyerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuyerId::Number(n) => write!(f, "{n}"),
            BuyerId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Priority bucket the service assigns to a prospect.
///
/// The wire form is a display string (`"High Priority"`). Anything outside
/// the three known buckets is kept as [`ProspectStatus::Unknown`] rather than
/// failing the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProspectStatus {
    HighPriority,
    MediumPriority,
    LowPriority,
    #[default]
    Unknown,
}

impl ProspectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectStatus::HighPriority => "High Priority",
            ProspectStatus::MediumPriority => "Medium Priority",
            ProspectStatus::LowPriority => "Low Priority",
            ProspectStatus::Unknown => "Unknown",
        }
    }
}

impl From<String> for ProspectStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high priority" => ProspectStatus::HighPriority,
            "medium priority" => ProspectStatus::MediumPriority,
            "low priority" => ProspectStatus::LowPriority,
            _ => ProspectStatus::Unknown,
        }
    }
}

impl From<ProspectStatus> for String {
    fn from(status: ProspectStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProspectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key contact at a prospect.
///
/// The service mixes structured entries with legacy bare display strings;
/// both decode, anything else fails the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contact {
    Named {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Legacy(String),
}

impl Contact {
    /// Single display line: `"Jane Doe (Head of Procurement)"`, the role
    /// dropped when absent or empty.
    pub fn display_line(&self) -> String {
        match self {
            Contact::Named { name, role, .. } => {
                match role.as_deref().filter(|r| !r.trim().is_empty()) {
                    Some(role) => format!("{name} ({role})"),
                    None => name.clone(),
                }
            }
            Contact::Legacy(text) => text.clone(),
        }
    }
}

/// One potential buyer surfaced by the research service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerProspect {
    pub id: BuyerId,
    pub name: String,
    pub website: String,
    pub country: String,
    pub region: Option<String>,
    pub target_segment: String,
    #[serde(default)]
    pub key_contacts: Vec<Contact>,
    pub reason_for_recommendation: String,
    pub opportunity_score: u8,
    #[serde(default)]
    pub status: ProspectStatus,
}

/// A complete research response.
///
/// `source_company` and `discovered_buyers` must both be present for the
/// payload to decode; an empty buyer list is a valid outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    pub source_company: SourceCompanyProfile,
    pub ideal_customer_profile: Option<String>,
    pub discovered_buyers: Vec<BuyerProspect>,
}

impl ResearchResult {
    /// Look up a prospect by id, honoring the string/numeric equivalence of
    /// [`BuyerId`].
    pub fn buyer(&self, id: &BuyerId) -> Option<&BuyerProspect> {
        self.discovered_buyers.iter().find(|b| &b.id == id)
    }
}

/// Payload of the development status probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub mode: ServiceMode,
    pub message: Option<String>,
}

/// Whether the research service answers with canned or live research.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    Mock,
    Live,
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceMode::Mock => f.write_str("mock"),
            ServiceMode::Live => f.write_str("live"),
        }
    }
}
