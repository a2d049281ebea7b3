//! # Dataset Shaping: Raw Regulations to Record Batches
//!
//! Raw regulation documents nest everything a regulation contains
//! (preamble sections, articles, definitions, amendment status) inside one
//! object. [`shape`] flattens them into the batch mapping the builder
//! consumes:
//!
//! | Batch | Source |
//! |-------|--------|
//! | `node_Regulation` | the document itself |
//! | `node_Consideration`, `edge_HAS_CONSIDERATION` | `content.considering` |
//! | `node_Observation`, `edge_HAS_OBSERVATION` | `content.observing` |
//! | `node_Article`, `edge_HAS_ARTICLE` | `content.articles` |
//! | `edge_REFER_TO` | `article.references` |
//! | `edge_art_AMENDED_BY` | `article.amend` |
//! | `node_Definition`, `edge_HAS_DEFINITION` | any other `content` key |
//! | `edge_reg_AMENDED_BY` | `status.amend` |
//!
//! Article rows keep `previous_article`, `next_article` and the owning
//! regulation's `amendment_number`; the builder turns those into
//! `NextArticle` edges. No `edge_NEXT_ARTICLE` batch is produced.
//!
//! Ids in raw documents are sometimes numbers and sometimes numeric
//! strings; both are accepted. Entries of `status.amend` that point at the
//! external legal portal instead of a regulation id are skipped.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use lexgraph_core::{GraphError, GraphResult, RecordBatches};

/// Host of the external legal portal; `status.amend` links to it are not
/// regulation ids.
const PORTAL_HOST: &str = "peraturan.bpk.go.id";

/// Collection name used in errors raised while shaping.
const RAW: &str = "raw";

/// Every batch [`shape`] emits. A store is only considered loaded when each
/// of these is present and non-empty.
pub const EXPECTED_COLLECTIONS: [&str; 12] = [
    "node_Regulation",
    "node_Consideration",
    "node_Observation",
    "node_Article",
    "node_Definition",
    "edge_reg_AMENDED_BY",
    "edge_HAS_CONSIDERATION",
    "edge_HAS_OBSERVATION",
    "edge_HAS_DEFINITION",
    "edge_HAS_ARTICLE",
    "edge_REFER_TO",
    "edge_art_AMENDED_BY",
];

/// Expected batches that are absent or empty.
pub fn missing_collections(batches: &RecordBatches) -> Vec<&'static str> {
    EXPECTED_COLLECTIONS
        .into_iter()
        .filter(|name| batches.get(*name).map_or(true, Vec::is_empty))
        .collect()
}

// ---------------------------------------------------------------------------
// Raw document types
// ---------------------------------------------------------------------------

/// An id as it appears in raw documents: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// JSON integer.
    Number(i64),
    /// String, expected to hold an integer (or be empty).
    Text(String),
}

impl RawId {
    /// `Ok(None)` for an empty string, `Err` for a non-numeric one.
    fn resolve(&self) -> Result<Option<i64>, String> {
        match self {
            Self::Number(n) => Ok(Some(*n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| format!("{s:?} is not an integer id")),
        }
    }
}

/// A raw regulation document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRegulation {
    pub id: RawId,
    pub title: String,
    #[serde(default)]
    pub short_type: String,
    pub number: RawId,
    pub year: RawId,
    /// Amendment sequence number; zero for an original regulation.
    pub amendment: RawId,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub issue_place: String,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub subjects: Value,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub download_link: String,
    #[serde(default)]
    pub download_name: String,
    #[serde(default)]
    pub status: RawStatus,
    #[serde(default)]
    pub content: RawContent,
}

/// Amendment status of a regulation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatus {
    /// Regulations this one amends (ids, or portal links to skip).
    #[serde(default)]
    pub amend: Vec<RawId>,
}

/// The body of a regulation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub considering: Option<RawSection>,
    #[serde(default)]
    pub observing: Option<RawSection>,
    #[serde(default)]
    pub articles: BTreeMap<String, RawArticle>,
    /// Every other key holds a list of definitions.
    #[serde(flatten)]
    pub definitions: BTreeMap<String, Vec<RawDefinition>>,
}

/// A preamble section ("considering" / "observing").
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub id: RawId,
    pub text: String,
}

/// A raw article.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    pub id: RawId,
    pub article_number: String,
    #[serde(default)]
    pub chapter_number: Option<String>,
    #[serde(default)]
    pub chapter_about: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub part_about: Option<String>,
    #[serde(default)]
    pub paragraph_number: Option<String>,
    #[serde(default)]
    pub paragraph_about: Option<String>,
    pub text: String,
    #[serde(default)]
    pub previous_article: Option<RawId>,
    #[serde(default)]
    pub next_article: Option<RawId>,
    #[serde(default)]
    pub references: Vec<RawId>,
    #[serde(default)]
    pub amend: Vec<RawId>,
}

/// A raw defined term.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDefinition {
    pub id: RawId,
    pub name: String,
    pub definition: String,
}

// ---------------------------------------------------------------------------
// Shaping
// ---------------------------------------------------------------------------

/// Flatten raw regulation documents into record batches.
///
/// Every batch in [`EXPECTED_COLLECTIONS`] is present in the output, even
/// if empty.
pub fn shape(raw: &[RawRegulation]) -> GraphResult<RecordBatches> {
    let mut out: RecordBatches = EXPECTED_COLLECTIONS
        .into_iter()
        .map(|name| (name.to_string(), Vec::new()))
        .collect();

    for (row, regulation) in raw.iter().enumerate() {
        Shaper { out: &mut out, row }.regulation(regulation)?;
    }

    tracing::info!(
        regulations = raw.len(),
        articles = out["node_Article"].len(),
        "shaped raw regulations into batches"
    );
    Ok(out)
}

struct Shaper<'a> {
    out: &'a mut RecordBatches,
    row: usize,
}

impl Shaper<'_> {
    fn id(&self, raw: &RawId, what: &str) -> GraphResult<i64> {
        self.opt_id(raw, what)?
            .ok_or_else(|| GraphError::malformed(RAW, self.row, format!("{what}: empty id")))
    }

    fn opt_id(&self, raw: &RawId, what: &str) -> GraphResult<Option<i64>> {
        raw.resolve()
            .map_err(|detail| GraphError::malformed(RAW, self.row, format!("{what}: {detail}")))
    }

    fn push(&mut self, batch: &str, value: Value) {
        if let (Some(rows), Value::Object(record)) = (self.out.get_mut(batch), value) {
            rows.push(record);
        }
    }

    fn contains(&mut self, batch: &str, from_type: &str, from: i64, to_type: &str, to: i64) {
        self.push(
            batch,
            json!({"from_type": from_type, "from": from, "to_type": to_type, "to": to}),
        );
    }

    fn regulation(&mut self, reg: &RawRegulation) -> GraphResult<()> {
        let id = self.id(&reg.id, "regulation id")?;
        let amendment = self.id(&reg.amendment, "regulation amendment")?;
        let number = self.id(&reg.number, "regulation number")?;
        let year = self.id(&reg.year, "regulation year")?;

        self.push(
            "node_Regulation",
            json!({
                "id": id,
                "title": reg.title,
                "type": reg.short_type,
                "number": number,
                "year": year,
                "is_amendment": amendment != 0,
                "institution": reg.institution,
                "issue_place": reg.issue_place,
                "issue_date": non_empty(&reg.issue_date),
                "effective_date": non_empty(&reg.effective_date),
                "subjects": reg.subjects,
                "reference_url": reg.url,
                "download_url": reg.download_link,
                "download_name": reg.download_name,
            }),
        );

        for amended in &reg.status.amend {
            if let RawId::Text(link) = amended {
                if link.to_ascii_lowercase().contains(PORTAL_HOST) {
                    continue;
                }
            }
            let amended = self.id(amended, "status.amend")?;
            self.push(
                "edge_reg_AMENDED_BY",
                json!({
                    "from_type": "Regulation",
                    "from": amended,
                    "to_type": "Regulation",
                    "to": id,
                    "amendment_number": amendment,
                }),
            );
        }

        let content = &reg.content;
        if let Some(section) = &content.considering {
            let section_id = self.id(&section.id, "considering id")?;
            self.push("node_Consideration", json!({"id": section_id, "text": section.text}));
            self.contains("edge_HAS_CONSIDERATION", "Regulation", id, "Consideration", section_id);
        }
        if let Some(section) = &content.observing {
            let section_id = self.id(&section.id, "observing id")?;
            self.push("node_Observation", json!({"id": section_id, "text": section.text}));
            self.contains("edge_HAS_OBSERVATION", "Regulation", id, "Observation", section_id);
        }
        for article in content.articles.values() {
            self.article(reg, id, amendment, article)?;
        }
        for definition in content.definitions.values().flatten() {
            let def_id = self.id(&definition.id, "definition id")?;
            let text = format!(
                "{}, Definisi {}:\n{}",
                reg.title, definition.name, definition.definition
            );
            self.push(
                "node_Definition",
                json!({"id": def_id, "name": definition.name, "text": text.trim()}),
            );
            self.contains("edge_HAS_DEFINITION", "Regulation", id, "Definition", def_id);
        }
        Ok(())
    }

    fn article(
        &mut self,
        reg: &RawRegulation,
        reg_id: i64,
        amendment: i64,
        article: &RawArticle,
    ) -> GraphResult<()> {
        let id = self.id(&article.id, "article id")?;
        let previous = match &article.previous_article {
            Some(raw) => self.opt_id(raw, "previous_article")?,
            None => None,
        };
        let next = match &article.next_article {
            Some(raw) => self.opt_id(raw, "next_article")?,
            None => None,
        };

        self.push(
            "node_Article",
            json!({
                "id": id,
                "number": article.article_number,
                "chapter": non_empty(&article.chapter_number),
                "part": non_empty(&article.part_number),
                "paragraph": non_empty(&article.paragraph_number),
                "text": article_text(&reg.title, article),
                "previous_article": previous,
                "next_article": next,
                "amendment_number": amendment,
            }),
        );
        self.contains("edge_HAS_ARTICLE", "Regulation", reg_id, "Article", id);

        for reference in &article.references {
            let target = self.id(reference, "article reference")?;
            self.contains("edge_REFER_TO", "Article", id, "Article", target);
        }
        for amended in &article.amend {
            let source = self.id(amended, "article amend")?;
            self.contains("edge_art_AMENDED_BY", "Article", source, "Article", id);
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Article text prefixed with its regulation and structural headings.
fn article_text(title: &str, article: &RawArticle) -> String {
    let mut text = format!("{title}, ");
    for heading in [
        &article.chapter_about,
        &article.part_about,
        &article.paragraph_about,
    ] {
        if let Some(heading) = non_empty(heading) {
            text.push_str(heading);
            text.push_str(", ");
        }
    }
    text.push_str(&format!("Pasal {}:\n{}", article.article_number, article.text));
    text.trim().to_string()
}
