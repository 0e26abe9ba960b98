//! Static legal-reference catalog.
//!
//! Fixed datasets (constitutional rights, bare acts, government updates)
//! that are loaded once at process start and synced through the same
//! chunked reconcile-and-write path as scraped records. The content here
//! is input data, not pipeline logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sink::{ConflictPolicy, RecordSink, SinkTarget};
use crate::types::SinkRecord;
use crate::writer::{reconcile_and_write, WriteOutcome};

/// Rights catalog is append-only: curators amend rows in place, so a
/// re-sync must never overwrite them.
pub const RIGHTS_TARGET: SinkTarget = SinkTarget {
    table: "legal_rights",
    key_field: "title",
    policy: ConflictPolicy::Insert,
};

/// Acts legitimately arrive re-fetched with updated fields.
pub const ACTS_TARGET: SinkTarget = SinkTarget {
    table: "bare_acts",
    key_field: "title",
    policy: ConflictPolicy::Upsert { on_conflict: "title" },
};

pub const UPDATES_TARGET: SinkTarget = SinkTarget {
    table: "gov_updates",
    key_field: "source_url",
    policy: ConflictPolicy::Upsert { on_conflict: "source_url" },
};

/// Reference catalogs sync in small chunks; rows are wide.
const CATALOG_CHUNK_SIZE: usize = 10;

/// One entry in the legal-rights catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,
    pub source_law: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub key_points: Vec<String>,
    pub examples: Vec<String>,
    pub remedies: String,
    pub applicable_to: String,
    pub status: String,
}

impl SinkRecord for ReferenceEntry {
    fn natural_key(&self) -> &str {
        &self.title
    }

    fn to_row(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// One statute in the bare-acts catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BareAct {
    pub title: String,
    pub short_title: String,
    pub category: String,
    pub year_enacted: i32,
    pub description: String,
    pub official_url: String,
    pub jurisdiction: String,
    pub status: String,
}

impl SinkRecord for BareAct {
    fn natural_key(&self) -> &str {
        &self.title
    }

    fn to_row(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// One government notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovUpdate {
    pub title: String,
    pub body: String,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
}

impl SinkRecord for GovUpdate {
    fn natural_key(&self) -> &str {
        &self.source_url
    }

    fn to_row(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// The full static reference dataset handed to the pipeline at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    pub rights: Vec<ReferenceEntry>,
    pub acts: Vec<BareAct>,
    pub updates: Vec<GovUpdate>,
}

impl ReferenceCatalog {
    pub fn is_empty(&self) -> bool {
        self.rights.is_empty() && self.acts.is_empty() && self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rights.len() + self.acts.len() + self.updates.len()
    }

    /// The built-in dataset shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            rights: builtin_rights(),
            acts: builtin_acts(),
            updates: builtin_updates(),
        }
    }
}

/// Sync the catalog into the store: rights insert-after-check, acts and
/// updates upserted on their natural keys.
pub async fn sync_catalog<S>(sink: &S, catalog: &ReferenceCatalog) -> WriteOutcome
where
    S: RecordSink + ?Sized,
{
    let mut outcome =
        reconcile_and_write(sink, &RIGHTS_TARGET, &catalog.rights, CATALOG_CHUNK_SIZE).await;
    outcome.absorb(reconcile_and_write(sink, &ACTS_TARGET, &catalog.acts, CATALOG_CHUNK_SIZE).await);
    outcome.absorb(
        reconcile_and_write(sink, &UPDATES_TARGET, &catalog.updates, CATALOG_CHUNK_SIZE).await,
    );
    outcome
}

fn builtin_rights() -> Vec<ReferenceEntry> {
    let entry = |title: &str,
                 description: &str,
                 category: &str,
                 article: Option<&str>,
                 source_law: &str,
                 key_points: &[&str],
                 examples: &[&str],
                 remedies: &str,
                 applicable_to: &str| ReferenceEntry {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        article_number: article.map(|a| a.to_string()),
        source_law: source_law.to_string(),
        source_url: Some("https://legislative.gov.in/constitution-of-india".to_string()),
        key_points: key_points.iter().map(|s| s.to_string()).collect(),
        examples: examples.iter().map(|s| s.to_string()).collect(),
        remedies: remedies.to_string(),
        applicable_to: applicable_to.to_string(),
        status: "Active".to_string(),
    };

    vec![
        entry(
            "Right to Equality",
            "The State shall not deny to any person equality before the law or the equal \
             protection of the laws within the territory of India.",
            "Fundamental Rights",
            Some("Article 14"),
            "Constitution of India",
            &[
                "All persons are equal before law",
                "Equal protection of laws to everyone",
                "Prohibition of discrimination on grounds of religion, race, caste, sex or place of birth",
            ],
            &[
                "A person cannot be denied a job based on caste",
                "All citizens can access public places equally",
            ],
            "Writ petition under Article 32 (Supreme Court) or Article 226 (High Court)",
            "All Persons",
        ),
        entry(
            "Prohibition of Discrimination",
            "The State shall not discriminate against any citizen on grounds only of religion, \
             race, caste, sex, place of birth or any of them.",
            "Fundamental Rights",
            Some("Article 15"),
            "Constitution of India",
            &[
                "No discrimination in access to shops, public restaurants, hotels",
                "Special provisions for women and children allowed",
            ],
            &["SC/ST reservations in education", "Reserved seats for women in buses"],
            "Complaint with National/State Human Rights Commission or the courts",
            "All Citizens",
        ),
        entry(
            "Right to Freedom of Speech and Expression",
            "All citizens have the right to freedom of speech and expression, to assemble \
             peaceably, to form associations, to move freely throughout India, and to practice \
             any profession.",
            "Fundamental Rights",
            Some("Article 19"),
            "Constitution of India",
            &[
                "Freedom of speech and expression",
                "Right to assemble peacefully",
                "Right to form associations",
                "Subject to reasonable restrictions",
            ],
            &["Publishing newspapers", "Conducting peaceful protests", "Forming trade unions"],
            "Approach High Court or Supreme Court for protection of these freedoms",
            "Citizens Only",
        ),
        entry(
            "Right to Life and Personal Liberty",
            "No person shall be deprived of his life or personal liberty except according to \
             procedure established by law; expanded to include the right to live with dignity.",
            "Fundamental Rights",
            Some("Article 21"),
            "Constitution of India",
            &[
                "Right to life with human dignity",
                "Right to livelihood",
                "Right to privacy",
                "Right to speedy trial",
                "Right to legal aid",
            ],
            &["Free legal aid in criminal cases", "Compensation for illegal detention"],
            "Writ of habeas corpus; petition under Article 32 or 226",
            "All Persons",
        ),
        entry(
            "Right to Minimum Wages",
            "Every worker is entitled to minimum wages as notified for their category of \
             employment, with overtime at double rate and mandatory rest days.",
            "Labour Rights",
            None,
            "Minimum Wages Act 1948",
            &[
                "Minimum wages vary by state and industry",
                "Overtime at double rate",
                "Payment in legal tender",
            ],
            &["Construction workers", "Domestic workers", "Agricultural laborers"],
            "Approach Labour Commissioner, file claim in Labour Court",
            "All Workers",
        ),
        entry(
            "Right to Clean Environment",
            "Every person has the right to live in a clean and healthy environment, as part of \
             the Right to Life under Article 21.",
            "Environmental Rights",
            None,
            "Environment Protection Act 1986, NGT Act 2010",
            &[
                "Clean air and water are fundamental rights",
                "Polluter pays principle",
                "National Green Tribunal for environmental disputes",
            ],
            &["Filing a case against a polluting factory", "Challenging illegal mining"],
            "Approach National Green Tribunal, Pollution Control Board, or High Court",
            "All Persons",
        ),
    ]
}

fn builtin_acts() -> Vec<BareAct> {
    vec![
        BareAct {
            title: "The Disaster Management Act, 2005".to_string(),
            short_title: "DMA".to_string(),
            category: "Civil".to_string(),
            year_enacted: 2005,
            description: "An Act to provide for the effective management of disasters and for \
                          matters connected therewith or incidental thereto."
                .to_string(),
            official_url: "https://indiacode.nic.in/handle/123456789/2153".to_string(),
            jurisdiction: "Central".to_string(),
            status: "Active".to_string(),
        },
        BareAct {
            title: "The Epidemic Diseases Act, 1897".to_string(),
            short_title: "Epidemic Act".to_string(),
            category: "Health".to_string(),
            year_enacted: 1897,
            description: "An Act to provide for the better prevention of the spread of Dangerous \
                          Epidemic Diseases."
                .to_string(),
            official_url: "https://indiacode.nic.in/handle/123456789/1389".to_string(),
            jurisdiction: "Central".to_string(),
            status: "Active".to_string(),
        },
    ]
}

fn builtin_updates() -> Vec<GovUpdate> {
    let update = |title: &str, body: &str, source_url: &str| GovUpdate {
        title: title.to_string(),
        body: body.to_string(),
        source_url: source_url.to_string(),
        published_at: Utc::now(),
    };

    vec![
        update(
            "New Cybersecurity Regulations",
            "India introduces new cybersecurity framework for businesses",
            "https://example.com/cybersecurity-regulations",
        ),
        update(
            "Property Tax Updates",
            "Changes to property tax calculations in major cities",
            "https://example.com/property-tax-updates",
        ),
        update(
            "Labor Law Amendments",
            "Recent amendments to labor laws affecting employment contracts",
            "https://example.com/labor-law-amendments",
        ),
    ]
}
