/// Query Layer
///
/// Pure read-side predicates over store snapshots: document filtering and
/// sorting for the browse views, folder-tree helpers for the sidebar, and
/// the cycle check the store runs before accepting a reparent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Document, DocumentStatus, Folder};

/// Active document filters, as held in the store's transient UI state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentFilters {
    /// Type tokens to keep; empty means no type restriction
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Statuses to keep; empty means no status restriction
    pub status: Vec<DocumentStatus>,
    /// Created-at window; open on either side
    pub date_range: DateRange,
}

/// A half-open or closed created-at window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A complete document query: folder scope, free text, and filters
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Restrict to one folder, ignoring the tree below it
    pub folder_id: Option<String>,
    /// Case-insensitive substring match on the document name
    pub text: Option<String>,
    pub filters: DocumentFilters,
}

impl DocumentQuery {
    /// Whether a single document passes every predicate of this query
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(folder_id) = &self.folder_id {
            if &doc.folder_id != folder_id {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !text.is_empty()
                && !doc.name.to_lowercase().contains(&text.to_lowercase())
            {
                return false;
            }
        }
        if !self.filters.types.is_empty() && !self.filters.types.contains(&doc.doc_type) {
            return false;
        }
        if !self.filters.status.is_empty() && !self.filters.status.contains(&doc.status) {
            return false;
        }
        if let Some(start) = self.filters.date_range.start {
            if doc.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.filters.date_range.end {
            if doc.created_at > end {
                return false;
            }
        }
        true
    }
}

/// Filter documents by a query and sort most-recently-updated first
///
/// This is the exact predicate composition the browse views apply: folder
/// scope, free text, type/status membership, and created-at window.
pub fn filter_documents(documents: &[Document], query: &DocumentQuery) -> Vec<Document> {
    let mut matched: Vec<Document> = documents
        .iter()
        .filter(|doc| query.matches(doc))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    matched
}

/// List the direct children of a folder (or the roots, for `None`)
pub fn child_folders<'a>(folders: &'a [Folder], parent_id: Option<&str>) -> Vec<&'a Folder> {
    folders
        .iter()
        .filter(|f| f.parent_id.as_deref() == parent_id)
        .collect()
}

/// Check whether attaching `folder_id` under `new_parent_id` would create
/// a cycle in the folder tree
///
/// Walks the parent chain upward from the proposed parent. The walk is
/// bounded by the number of folders, so a pre-existing loop cannot hang it.
pub fn would_create_cycle(folders: &[Folder], folder_id: &str, new_parent_id: &str) -> bool {
    if folder_id == new_parent_id {
        return true;
    }
    let mut current = Some(new_parent_id.to_string());
    let mut hops = 0;
    while let Some(id) = current {
        if id == folder_id {
            return true;
        }
        hops += 1;
        if hops > folders.len() {
            return true;
        }
        current = folders
            .iter()
            .find(|f| f.id == id)
            .and_then(|f| f.parent_id.clone());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FolderType;
    use std::collections::HashMap;

    fn doc(name: &str, doc_type: &str, status: DocumentStatus) -> Document {
        Document {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: String::new(),
            folder_id: "f1".to_string(),
            doc_type: doc_type.to_string(),
            url: format!("mem://{name}"),
            size: 1024,
            status,
            created_by: "u1".to_string(),
            assigned_to: None,
            workflow_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            tags: vec![],
            metadata: HashMap::new(),
        }
    }

    fn folder(id: &str, parent: Option<&str>) -> Folder {
        Folder {
            id: id.to_string(),
            name: id.to_string(),
            parent_id: parent.map(str::to_string),
            folder_type: FolderType::Folder,
            department_id: "d1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_filter_keeps_matching_documents_only() {
        let docs = vec![
            doc("A.pdf", "pdf", DocumentStatus::Draft),
            doc("B.png", "png", DocumentStatus::Approved),
        ];
        let query = DocumentQuery {
            filters: DocumentFilters {
                status: vec![DocumentStatus::Approved],
                ..Default::default()
            },
            ..Default::default()
        };

        let matched = filter_documents(&docs, &query);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "B.png");
    }

    #[test]
    fn free_text_match_is_case_insensitive() {
        let docs = vec![
            doc("A.pdf", "pdf", DocumentStatus::Draft),
            doc("B.png", "png", DocumentStatus::Approved),
        ];
        let query = DocumentQuery {
            text: Some("a".to_string()),
            ..Default::default()
        };

        let matched = filter_documents(&docs, &query);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "A.pdf");
    }

    #[test]
    fn type_and_status_filters_compose() {
        let docs = vec![
            doc("A.pdf", "pdf", DocumentStatus::Draft),
            doc("B.png", "png", DocumentStatus::Approved),
            doc("C.pdf", "pdf", DocumentStatus::Approved),
        ];
        let query = DocumentQuery {
            filters: DocumentFilters {
                types: vec!["pdf".to_string()],
                status: vec![DocumentStatus::Approved],
                ..Default::default()
            },
            ..Default::default()
        };

        let matched = filter_documents(&docs, &query);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "C.pdf");
    }

    #[test]
    fn results_sort_most_recently_updated_first() {
        let mut older = doc("old.pdf", "pdf", DocumentStatus::Draft);
        older.updated_at = Utc::now() - chrono::Duration::hours(1);
        let newer = doc("new.pdf", "pdf", DocumentStatus::Draft);
        let docs = vec![older, newer];

        let matched = filter_documents(&docs, &DocumentQuery::default());
        assert_eq!(matched[0].name, "new.pdf");
        assert_eq!(matched[1].name, "old.pdf");
    }

    #[test]
    fn date_range_bounds_created_at() {
        let mut early = doc("early.pdf", "pdf", DocumentStatus::Draft);
        early.created_at = Utc::now() - chrono::Duration::days(10);
        let recent = doc("recent.pdf", "pdf", DocumentStatus::Draft);
        let docs = vec![early, recent];

        let query = DocumentQuery {
            filters: DocumentFilters {
                date_range: DateRange {
                    start: Some(Utc::now() - chrono::Duration::days(1)),
                    end: None,
                },
                ..Default::default()
            },
            ..Default::default()
        };

        let matched = filter_documents(&docs, &query);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "recent.pdf");
    }

    #[test]
    fn child_folders_lists_one_level() {
        let folders = vec![
            folder("root", None),
            folder("a", Some("root")),
            folder("b", Some("root")),
            folder("a1", Some("a")),
        ];

        let roots = child_folders(&folders, None);
        assert_eq!(roots.len(), 1);
        let children: Vec<&str> = child_folders(&folders, Some("root"))
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(children, vec!["a", "b"]);
    }

    #[test]
    fn cycle_check_catches_self_and_descendants() {
        let folders = vec![
            folder("root", None),
            folder("a", Some("root")),
            folder("a1", Some("a")),
        ];

        assert!(would_create_cycle(&folders, "a", "a"));
        assert!(would_create_cycle(&folders, "a", "a1"));
        assert!(would_create_cycle(&folders, "root", "a1"));
        assert!(!would_create_cycle(&folders, "a1", "root"));
    }
}
