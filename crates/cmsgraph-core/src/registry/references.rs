//! Reference target resolution.

use std::collections::BTreeMap;

use super::RegistryEntry;
use crate::error::Error;
use crate::graph::GraphStore;
use crate::model::FieldDescriptor;

/// Resolves the permitted targets of reference fields into type names.
///
/// Targets are looked up in the classified schema batch, never in raw
/// descriptors, so every named target must be part of the same batch.
pub struct ReferenceResolver<'a> {
    entries: &'a BTreeMap<String, RegistryEntry>,
}

impl<'a> ReferenceResolver<'a> {
    /// Create a resolver over a classified schema batch.
    pub fn new(entries: &'a BTreeMap<String, RegistryEntry>) -> Self {
        Self { entries }
    }

    /// Internal type names a reference field may point at.
    ///
    /// One name per distinct target type name, in validation order. Target
    /// content types that share a type name collapse into one entry. A field
    /// without validations may point at every type in the batch.
    pub fn target_names(
        &self,
        content_type: &str,
        field: &FieldDescriptor,
    ) -> Result<Vec<String>, Error> {
        let validations = field.kind.link_content_types().unwrap_or_default();

        if validations.is_empty() {
            let mut names: Vec<String> = self
                .entries
                .values()
                .map(|entry| entry.type_name.clone())
                .collect();
            names.sort();
            names.dedup();
            return Ok(names);
        }

        let mut names: Vec<String> = Vec::with_capacity(validations.len());
        for target in validations {
            let entry = self
                .entries
                .get(target)
                .ok_or_else(|| Error::UnknownTargetType {
                    content_type: content_type.to_string(),
                    field: field.id.clone(),
                    target: target.clone(),
                })?;
            if !names.contains(&entry.type_name) {
                names.push(entry.type_name.clone());
            }
        }
        Ok(names)
    }

    /// Map target names to the names of types registered with `store`.
    pub fn registered_targets<G: GraphStore + ?Sized>(
        &self,
        names: &[String],
        store: &G,
    ) -> Result<Vec<String>, Error> {
        names
            .iter()
            .map(|name| {
                store
                    .type_handle(name)
                    .map(|handle| handle.name().to_string())
                    .ok_or_else(|| Error::TypeNotRegistered(name.clone()))
            })
            .collect()
    }
}
