//! Schema registry.
//!
//! The registry classifies every content type of a batch, registers the
//! resulting type schemas and reference declarations with a
//! [`GraphStore`], and keeps the classification for entry ingestion. It is
//! built once per run and read-only afterwards.

mod references;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, instrument, warn};

use crate::error::Error;
use crate::graph::{GraphStore, ReferenceDef, TypeDef, TypeHandle};
use crate::model::{ContentTypeDescriptor, FieldClass, FieldDescriptor};
use crate::resolve::{resolve_type, FieldType};

pub use references::ReferenceResolver;

/// Derives internal type names from content types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNamer {
    prefix: String,
}

impl TypeNamer {
    /// Create a namer that prepends `prefix` to content type names.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Internal type name of a content type.
    pub fn type_name(&self, content_type: &ContentTypeDescriptor) -> String {
        format!("{}{}", self.prefix, content_type.name)
    }
}

/// A field classified as scalar, with its resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// Field descriptor.
    pub field: FieldDescriptor,
    /// Resolved internal type.
    pub field_type: FieldType,
}

/// A field classified as an entry reference, with its target type names.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceField {
    /// Field descriptor.
    pub field: FieldDescriptor,
    /// Internal names of the permitted target types.
    pub targets: Vec<String>,
}

/// Classification of one content type.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    /// Original descriptor.
    pub content_type: ContentTypeDescriptor,
    /// Internal type name.
    pub type_name: String,
    /// Fields copied onto nodes as values.
    pub fields: Vec<ScalarField>,
    /// Fields resolved to node ids.
    pub refs: Vec<ReferenceField>,
    /// Asset link fields, carried by neither map.
    pub excluded: Vec<FieldDescriptor>,
}

impl RegistryEntry {
    /// Partition the fields of a content type.
    ///
    /// Reference targets are left empty; they are filled in once the whole
    /// batch is classified.
    pub fn classify(content_type: ContentTypeDescriptor, namer: &TypeNamer) -> Self {
        let type_name = namer.type_name(&content_type);
        let mut fields = Vec::new();
        let mut refs = Vec::new();
        let mut excluded = Vec::new();

        for field in &content_type.fields {
            match field.class() {
                FieldClass::Scalar => {
                    if let Some(field_type) = resolve_type(field) {
                        fields.push(ScalarField {
                            field: field.clone(),
                            field_type,
                        });
                    }
                }
                FieldClass::Reference => refs.push(ReferenceField {
                    field: field.clone(),
                    targets: Vec::new(),
                }),
                FieldClass::Excluded => excluded.push(field.clone()),
            }
        }

        Self {
            content_type,
            type_name,
            fields,
            refs,
            excluded,
        }
    }

    /// Type schema to register for this content type.
    pub fn type_def(&self) -> TypeDef {
        self.fields
            .iter()
            .fold(TypeDef::new(self.type_name.clone()), |def, scalar| {
                def.with_field(
                    scalar.field.id.clone(),
                    scalar.field.name.clone(),
                    scalar.field_type,
                )
            })
    }

    /// Display field id of the content type.
    pub fn display_field(&self) -> Option<&str> {
        self.content_type.display_field.as_deref()
    }
}

/// Summary of a schema ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Number of types registered.
    pub types_registered: usize,
    /// Number of reference declarations added.
    pub references_declared: usize,
    /// Number of references with more than one target type.
    pub union_references: usize,
    /// Number of asset link fields left out of the graph.
    pub excluded_fields: usize,
    /// Content type ids whose earlier descriptor was replaced by a later one.
    pub overwritten: Vec<String>,
    /// Type names shared by more than one content type id.
    pub name_collisions: Vec<String>,
}

/// Classified content types keyed by external content type id.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl SchemaRegistry {
    /// Classify a batch of content types and register it with `store`.
    ///
    /// Reference targets are checked against the batch before anything is
    /// written, so an inconsistent batch fails without registering any type.
    /// A content type id that appears twice keeps its later descriptor.
    /// Content types with different ids but the same type name share one
    /// graph type; the one with the greatest id defines its fields.
    #[instrument(skip_all, fields(content_types = content_types.len()))]
    pub fn ingest<G: GraphStore + ?Sized>(
        content_types: Vec<ContentTypeDescriptor>,
        namer: &TypeNamer,
        store: &G,
    ) -> Result<(Self, SchemaReport), Error> {
        let mut report = SchemaReport::default();
        let mut entries: BTreeMap<String, RegistryEntry> = BTreeMap::new();

        for content_type in content_types {
            let entry = RegistryEntry::classify(content_type, namer);
            if let Some(previous) = entries.insert(entry.content_type.id.clone(), entry) {
                warn!(
                    content_type = %previous.content_type.id,
                    "duplicate content type id, keeping the later descriptor"
                );
                report.overwritten.push(previous.content_type.id);
            }
        }

        let mut by_type_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for entry in entries.values() {
            by_type_name
                .entry(entry.type_name.as_str())
                .or_default()
                .push(entry.content_type.id.as_str());
        }
        for (type_name, ids) in by_type_name.into_iter().filter(|(_, ids)| ids.len() > 1) {
            warn!(
                type_name,
                content_types = ?ids,
                "content types share a type name and will be merged into one type"
            );
            report.name_collisions.push(type_name.to_string());
        }

        let resolved = {
            let resolver = ReferenceResolver::new(&entries);
            let mut resolved = Vec::new();
            for entry in entries.values() {
                for (index, reference) in entry.refs.iter().enumerate() {
                    let names = resolver.target_names(&entry.content_type.id, &reference.field)?;
                    resolved.push((entry.content_type.id.clone(), index, names));
                }
            }
            resolved
        };
        for (id, index, names) in resolved {
            if let Some(entry) = entries.get_mut(&id) {
                entry.refs[index].targets = names;
            }
        }

        let mut handles: HashMap<String, TypeHandle> = HashMap::with_capacity(entries.len());
        for entry in entries.values() {
            let handle = store.register_type(entry.type_def())?;
            debug!(
                type_name = handle.name(),
                fields = entry.fields.len(),
                refs = entry.refs.len(),
                "registered type"
            );
            handles.insert(entry.content_type.id.clone(), handle);
            report.types_registered += 1;
            report.excluded_fields += entry.excluded.len();
        }

        let resolver = ReferenceResolver::new(&entries);
        for entry in entries.values() {
            let Some(handle) = handles.get(&entry.content_type.id) else {
                continue;
            };
            for reference in &entry.refs {
                let types = resolver.registered_targets(&reference.targets, store)?;
                let declaration = ReferenceDef {
                    name: reference.field.id.clone(),
                    description: reference.field.name.clone(),
                    types,
                };
                if declaration.is_union() {
                    report.union_references += 1;
                }
                store.add_reference(handle, declaration)?;
                report.references_declared += 1;
            }
        }

        info!(
            types = report.types_registered,
            references = report.references_declared,
            excluded_fields = report.excluded_fields,
            "schema ingestion complete"
        );

        Ok((Self { entries }, report))
    }

    /// Get the classification of a content type.
    pub fn get(&self, content_type_id: &str) -> Option<&RegistryEntry> {
        self.entries.get(content_type_id)
    }

    /// Iterate over classified content types, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Number of classified content types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use crate::model::{FieldKind, LinkKind};
    use crate::resolve::ScalarType;

    fn author() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new("author", "Author")
            .with_display_field("name")
            .with_field(FieldDescriptor::new("name", "Name", FieldKind::Symbol))
    }

    fn post() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new("post", "Post")
            .with_display_field("title")
            .with_fields([
                FieldDescriptor::new("title", "Title", FieldKind::Symbol),
                FieldDescriptor::new("tags", "Tags", FieldKind::array(FieldKind::Symbol)),
                FieldDescriptor::new("author", "Author", FieldKind::entry_links(["author"])),
                FieldDescriptor::new(
                    "gallery",
                    "Gallery",
                    FieldKind::array(FieldKind::Link(LinkKind::Asset)),
                ),
            ])
    }

    #[test]
    fn test_classify_partitions_every_field_once() {
        let entry = RegistryEntry::classify(post(), &TypeNamer::new("Contentful"));

        assert_eq!(entry.type_name, "ContentfulPost");
        let scalar: Vec<&str> = entry.fields.iter().map(|f| f.field.id.as_str()).collect();
        let refs: Vec<&str> = entry.refs.iter().map(|f| f.field.id.as_str()).collect();
        let excluded: Vec<&str> = entry.excluded.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(scalar, vec!["title", "tags"]);
        assert_eq!(refs, vec!["author"]);
        assert_eq!(excluded, vec!["gallery"]);
        assert_eq!(
            scalar.len() + refs.len() + excluded.len(),
            entry.content_type.fields.len()
        );
    }

    #[test]
    fn test_type_def_keeps_labels() {
        let entry = RegistryEntry::classify(post(), &TypeNamer::default());
        let def = entry.type_def();

        assert_eq!(def.name, "Post");
        assert_eq!(def.fields.len(), 2);
        assert_eq!(def.fields["title"].description, "Title");
        assert_eq!(
            def.fields["tags"].field_type,
            FieldType::List(ScalarType::String)
        );
        assert!(!def.fields.contains_key("author"));
    }

    #[test]
    fn test_ingest_registers_types_and_references() {
        let graph = MemoryGraph::new();
        let (registry, report) =
            SchemaRegistry::ingest(vec![post(), author()], &TypeNamer::new("Contentful"), &graph)
                .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(report.types_registered, 2);
        assert_eq!(report.references_declared, 1);
        assert_eq!(report.excluded_fields, 1);
        assert_eq!(graph.type_names(), vec!["ContentfulAuthor", "ContentfulPost"]);

        let refs = graph.references("ContentfulPost");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "author");
        assert_eq!(refs[0].description, "Author");
        assert_eq!(refs[0].types, vec!["ContentfulAuthor"]);

        let post = registry.get("post").unwrap();
        assert_eq!(post.refs[0].targets, vec!["ContentfulAuthor"]);
    }

    #[test]
    fn test_unknown_target_aborts_before_registration() {
        let graph = MemoryGraph::new();
        let err = SchemaRegistry::ingest(vec![post()], &TypeNamer::default(), &graph).unwrap_err();

        assert!(matches!(err, Error::UnknownTargetType { ref target, .. } if target == "author"));
        assert!(graph.type_names().is_empty());
    }

    #[test]
    fn test_duplicate_content_type_keeps_later() {
        let graph = MemoryGraph::new();
        let first = ContentTypeDescriptor::new("author", "Author")
            .with_field(FieldDescriptor::new("name", "Name", FieldKind::Symbol));
        let second = ContentTypeDescriptor::new("author", "Author")
            .with_field(FieldDescriptor::new("bio", "Bio", FieldKind::Text));

        let (registry, report) =
            SchemaRegistry::ingest(vec![first, second], &TypeNamer::default(), &graph).unwrap();

        assert_eq!(report.overwritten, vec!["author"]);
        let entry = registry.get("author").unwrap();
        assert_eq!(entry.fields.len(), 1);
        assert_eq!(entry.fields[0].field.id, "bio");
        assert!(graph.type_def("Author").unwrap().fields.contains_key("bio"));
    }

    #[test]
    fn test_shared_type_name_is_reported() {
        let graph = MemoryGraph::new();
        let author = ContentTypeDescriptor::new("author", "Person")
            .with_field(FieldDescriptor::new("name", "Name", FieldKind::Symbol));
        let editor = ContentTypeDescriptor::new("editor", "Person")
            .with_field(FieldDescriptor::new("desk", "Desk", FieldKind::Symbol));
        let article = ContentTypeDescriptor::new("article", "Article").with_field(
            FieldDescriptor::new("people", "People", FieldKind::entry_links(["author", "editor"])),
        );

        let (registry, report) =
            SchemaRegistry::ingest(vec![author, editor, article], &TypeNamer::default(), &graph)
                .unwrap();

        assert_eq!(report.name_collisions, vec!["Person"]);
        assert!(report.overwritten.is_empty());
        assert_eq!(registry.len(), 3);
        assert_eq!(graph.type_names(), vec!["Article", "Person"]);
        assert!(graph.type_def("Person").unwrap().fields.contains_key("desk"));

        let people = &registry.get("article").unwrap().refs[0];
        assert_eq!(people.targets, vec!["Person"]);
        assert_eq!(report.union_references, 0);
    }

    #[test]
    fn test_distinct_names_report_no_collision() {
        let graph = MemoryGraph::new();
        let (_, report) =
            SchemaRegistry::ingest(vec![post(), author()], &TypeNamer::default(), &graph).unwrap();
        assert!(report.name_collisions.is_empty());
    }
}
