//! Polymorphism resolution.
//!
//! Second pass over independently rendered descriptors. Each child that
//! declares a polymorphic identity is linked to its parent: the parent
//! records the discriminator and the identity → child mapping, and the child
//! inherits every parent attribute and relation it does not define itself.
//!
//! Links form a forest. Merging walks it parents-first (topological order),
//! so a grandchild sees fields its parent inherited.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{DatamodelError, DatamodelResult};
use crate::metadata::InheritanceHint;
use crate::model::{PolymorphicInfo, Schema};

/// A resolved child → parent link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceLink {
    pub child: String,
    pub parent: String,
    pub identity: String,
    pub discriminator: String,
}

/// Links declared models to their parents and merges inherited fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolymorphismResolver {
    strict: bool,
}

impl PolymorphismResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail instead of silently dropping an identity without a usable parent.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve inheritance across `schema` in place.
    pub fn resolve(
        &self,
        schema: &mut Schema,
        hints: &BTreeMap<String, InheritanceHint>,
    ) -> DatamodelResult<Vec<InheritanceLink>> {
        let links = self.detect(schema, hints)?;
        let order = merge_order(&links)?;

        let by_child: HashMap<&str, &InheritanceLink> =
            links.iter().map(|l| (l.child.as_str(), l)).collect();

        for name in order {
            if let Some(link) = by_child.get(name.as_str()) {
                apply(schema, link);
            }
        }

        Ok(links)
    }

    /// Find every usable child → parent link.
    pub fn detect(
        &self,
        schema: &Schema,
        hints: &BTreeMap<String, InheritanceHint>,
    ) -> DatamodelResult<Vec<InheritanceLink>> {
        let mut links = Vec::new();

        for (child, hint) in hints {
            let Some(identity) = &hint.identity else {
                continue;
            };
            if !schema.contains(child) {
                continue;
            }

            // An identity without a declared parent marks the hierarchy root.
            let Some(parent) = &hint.parent else {
                continue;
            };
            if !schema.contains(parent) {
                self.fallback(DatamodelError::UnknownParent {
                    model: child.clone(),
                    parent: parent.clone(),
                })?;
                continue;
            }

            let Some(discriminator) = hints.get(parent).and_then(|h| h.discriminator.clone())
            else {
                self.fallback(DatamodelError::MissingDiscriminator {
                    model: child.clone(),
                    parent: parent.clone(),
                })?;
                continue;
            };

            links.push(InheritanceLink {
                child: child.clone(),
                parent: parent.clone(),
                identity: identity.clone(),
                discriminator,
            });
        }

        Ok(links)
    }

    fn fallback(&self, err: DatamodelError) -> DatamodelResult<()> {
        if self.strict {
            warn!("{}", err);
            return Err(err);
        }
        debug!("{}; rendering as non-polymorphic", err);
        Ok(())
    }
}

/// Order models so every parent precedes its children.
fn merge_order(links: &[InheritanceLink]) -> DatamodelResult<Vec<String>> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for link in links {
        let parent = *nodes
            .entry(link.parent.as_str())
            .or_insert_with(|| graph.add_node(link.parent.clone()));
        let child = *nodes
            .entry(link.child.as_str())
            .or_insert_with(|| graph.add_node(link.child.clone()));
        graph.add_edge(parent, child, ());
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|idx| graph[idx].clone()).collect()),
        Err(cycle) => {
            let mut members = tarjan_scc(&graph)
                .into_iter()
                .find(|scc| scc.contains(&cycle.node_id()))
                .unwrap_or_else(|| vec![cycle.node_id()])
                .into_iter()
                .map(|idx| graph[idx].clone())
                .collect::<Vec<_>>();
            members.sort();
            Err(DatamodelError::InheritanceCycle(members))
        }
    }
}

fn apply(schema: &mut Schema, link: &InheritanceLink) {
    let Some(parent) = schema.get_mut(&link.parent) else {
        return;
    };
    let info = parent.polymorphic.get_or_insert_with(PolymorphicInfo::default);
    info.on = Some(link.discriminator.clone());
    info.identities
        .insert(link.identity.clone(), link.child.clone());

    let attributes = parent.attributes.clone();
    let relations = parent.relations.clone();

    let Some(child) = schema.get_mut(&link.child) else {
        return;
    };
    for (name, tag) in attributes {
        if !child.defines(&name) {
            child.attributes.insert(name, tag);
        }
    }
    for (name, relation) in relations {
        if !child.defines(&name) {
            child.relations.insert(name, relation);
        }
    }
    child
        .polymorphic
        .get_or_insert_with(PolymorphicInfo::default)
        .parent = Some(link.parent.clone());
}
