//! Arena holding every introspected object.
//!
//! # Architecture
//!
//! Objects are stored in a flat `Vec<Object>` and reference each other by
//! [`ObjectId`]. The same object reachable under two names (a re-export) or
//! two modules importing each other are represented without duplication.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::object::{Member, Module, Object, ObjectId, RuntimeVersion, Storage};

/// Error loading or validating an object graph.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// Malformed object dump.
    #[error("Invalid object dump: {0}")]
    Json(#[from] serde_json::Error),
    /// A member points past the end of the object table.
    #[error("Object {from} references missing object {to}")]
    DanglingReference {
        /// Object holding the reference.
        from: ObjectId,
        /// Referenced id.
        to: ObjectId,
    },
    /// Requested root module is not part of the dump.
    #[error("Module {0} is not a root of the object dump")]
    UnknownRoot(String),
    /// A root name resolves to something other than a module.
    #[error("Root {name} is a {kind}, not a module")]
    NotAModule {
        /// Root name.
        name: String,
        /// Kind of the object it resolves to.
        kind: &'static str,
    },
}

/// Introspected object graph.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectGraph {
    #[serde(default)]
    runtime_version: RuntimeVersion,
    #[serde(default)]
    roots: BTreeMap<String, ObjectId>,
    #[serde(default)]
    objects: Vec<Object>,
}

impl ObjectGraph {
    /// Parse and validate an object dump.
    pub fn from_json(json: &str) -> Result<Self, InspectError> {
        let graph: Self = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }

    pub(crate) fn from_parts(
        runtime_version: RuntimeVersion,
        roots: BTreeMap<String, ObjectId>,
        objects: Vec<Object>,
    ) -> Result<Self, InspectError> {
        let graph = Self {
            runtime_version,
            roots,
            objects,
        };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<(), InspectError> {
        let len = self.objects.len();
        for (idx, object) in self.objects.iter().enumerate() {
            if let Some(to) = object.referenced_ids().find(|id| id.0 >= len) {
                return Err(InspectError::DanglingReference {
                    from: ObjectId(idx),
                    to,
                });
            }
        }
        for (name, &id) in &self.roots {
            match self.objects.get(id.0) {
                None => {
                    return Err(InspectError::DanglingReference {
                        from: id,
                        to: id,
                    });
                }
                Some(Object::Module(_)) => {}
                Some(other) => {
                    return Err(InspectError::NotAModule {
                        name: name.clone(),
                        kind: other.kind_name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Runtime version the dump was recorded from.
    #[must_use]
    pub fn runtime_version(&self) -> RuntimeVersion {
        self.runtime_version
    }

    /// Override the recorded runtime version.
    pub fn set_runtime_version(&mut self, version: RuntimeVersion) {
        self.runtime_version = version;
    }

    /// Object by id.
    ///
    /// Ids handed out by this graph are always valid.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    /// Resolve a root module by name.
    pub fn root(&self, name: &str) -> Result<(ObjectId, &Module), InspectError> {
        let id = *self
            .roots
            .get(name)
            .ok_or_else(|| InspectError::UnknownRoot(name.to_owned()))?;
        match self.object(id) {
            Object::Module(module) => Ok((id, module)),
            other => Err(InspectError::NotAModule {
                name: name.to_owned(),
                kind: other.kind_name(),
            }),
        }
    }

    /// Names of all root modules, sorted.
    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Look up a member of a module or class by attribute name.
#[must_use]
pub fn find_member<'a>(members: &'a [Member], name: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.name == name)
}

/// Builder for assembling an [`ObjectGraph`] in code.
///
/// # Example
///
/// ```
/// use refdoc_inspect::{Function, Module, Object, ObjectGraphBuilder};
///
/// let mut builder = ObjectGraphBuilder::new();
/// let pkg = builder.add_root("pkg", Module { name: "pkg".to_owned(), ..Default::default() });
/// let f = builder.add(Object::Function(Function {
///     name: "f".to_owned(),
///     module: Some("pkg".to_owned()),
///     ..Default::default()
/// }));
/// builder.attach(pkg, "f", f);
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.len(), 2);
/// ```
#[derive(Default)]
pub struct ObjectGraphBuilder {
    runtime_version: RuntimeVersion,
    roots: BTreeMap<String, ObjectId>,
    objects: Vec<Object>,
}

impl ObjectGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn runtime_version(mut self, version: RuntimeVersion) -> Self {
        self.runtime_version = version;
        self
    }

    /// Add an object and return its id.
    pub fn add(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    /// Add a module and register it as a root under `name`.
    pub fn add_root(&mut self, name: &str, module: Module) -> ObjectId {
        let id = self.add(Object::Module(module));
        self.roots.insert(name.to_owned(), id);
        id
    }

    /// Attach `child` as a plain attribute of the module or class `owner`.
    pub fn attach(&mut self, owner: ObjectId, name: &str, child: ObjectId) -> &mut Self {
        self.attach_with(owner, name, child, Storage::Plain)
    }

    /// Attach `child` to `owner` with an explicit storage wrapper.
    ///
    /// Attaching to anything but a module or class is ignored.
    pub fn attach_with(
        &mut self,
        owner: ObjectId,
        name: &str,
        child: ObjectId,
        storage: Storage,
    ) -> &mut Self {
        let member = Member {
            name: name.to_owned(),
            object: child,
            storage,
        };
        match self.objects.get_mut(owner.0) {
            Some(Object::Module(m)) => m.members.push(member),
            Some(Object::Class(c)) => c.members.push(member),
            _ => {}
        }
        self
    }

    /// Mutable access to an already added object.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0)
    }

    /// Finish the graph, validating every reference.
    pub fn build(self) -> Result<ObjectGraph, InspectError> {
        ObjectGraph::from_parts(self.runtime_version, self.roots, self.objects)
    }
}
