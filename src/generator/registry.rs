//! Type registry: the name and deduplication ledger of one generation run.
//!
//! The registry maps structural signatures to canonical types and exported
//! names to the type that owns them. It is the single arbiter of type
//! identity: two struct-shaped schema nodes with the same shape end up as the
//! same registered type, and no two distinct types ever share a name.
//!
//! Types are shared through [`Rc`], so a registry cannot cross threads. A
//! caller generating kinds in parallel gives each worker its own registry,
//! seeded identically (see [`crate::generator::seed`]).

use super::types::{is_exported, Type};
use crate::error::{GenerateError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use tracing::debug;

/// Name/dedup ledger for one generation run
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_signature: HashMap<String, Rc<Type>>,
    by_name: HashMap<String, Rc<Type>>,
    generated: HashSet<String>,
    reserved: HashSet<String>,
    renames: BTreeMap<String, String>,
    builtins: HashMap<String, Rc<Type>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with an explicit rename table (`candidate -> name`)
    pub fn with_renames(renames: BTreeMap<String, String>) -> Self {
        TypeRegistry {
            renames,
            ..Self::default()
        }
    }

    /// True iff a structurally equal type is registered
    pub fn has(&self, ty: &Type) -> bool {
        self.by_signature.contains_key(ty.signature())
    }

    /// Look a type up by its exported name
    pub fn get(&self, name: &str) -> Option<Rc<Type>> {
        self.by_name.get(name).map(Rc::clone)
    }

    /// Hold `name` for a later [`add`](Self::add).
    ///
    /// Name synthesis treats a reserved name as taken, so types built before
    /// the owner is registered cannot claim it. Reserving an already
    /// registered name fails like `add` does.
    pub fn reserve(&mut self, name: &str) -> Result<()> {
        if !is_exported(name) {
            return Err(GenerateError::UnexportedName(name.to_string()));
        }
        if self.by_name.contains_key(name) {
            return Err(GenerateError::NameExhausted {
                field: name.to_string(),
                ancestors: Vec::new(),
            });
        }
        self.reserved.insert(name.to_string());
        Ok(())
    }

    fn is_taken(&self, name: &str) -> bool {
        self.by_name.contains_key(name) || self.reserved.contains(name)
    }

    /// Register `ty` under its current name and its signature.
    ///
    /// The first type registered for a signature stays canonical for it.
    /// Registering a name that is already owned replaces nothing and is
    /// reported as [`GenerateError::NameExhausted`] with an empty chain. A
    /// reservation for the name is consumed.
    pub fn add(&mut self, ty: Type) -> Result<Rc<Type>> {
        if !is_exported(ty.name()) {
            return Err(GenerateError::UnexportedName(ty.name().to_string()));
        }
        if self.by_name.contains_key(ty.name()) {
            return Err(GenerateError::NameExhausted {
                field: ty.name().to_string(),
                ancestors: Vec::new(),
            });
        }
        self.reserved.remove(ty.name());
        let ty = Rc::new(ty);
        self.by_signature
            .entry(ty.signature().to_string())
            .or_insert_with(|| Rc::clone(&ty));
        self.by_name.insert(ty.name().to_string(), Rc::clone(&ty));
        Ok(ty)
    }

    /// Apply the explicit override table; unknown names pass through
    pub fn rename(&self, name: &str) -> String {
        self.renames
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Bind a freshly built struct or array type to its registered identity.
    ///
    /// 1. If a structurally equal type is registered, that type is returned
    ///    and `ty` is discarded.
    /// 2. Otherwise the candidate is `rename(ty.name())`; if neither
    ///    registered nor reserved it is used.
    /// 3. On collision, each ancestor from nearest to farthest is tried as a
    ///    prefix of the candidate.
    /// 4. If every prefix is taken the result is
    ///    [`GenerateError::NameExhausted`]; existing types are never
    ///    overwritten.
    ///
    /// Primitive, map and opaque types are returned as-is.
    pub fn resolve_field_type(&mut self, mut ty: Type, ancestors: &[String]) -> Result<Rc<Type>> {
        if !ty.is_named() {
            return Ok(Rc::new(ty));
        }
        if let Some(existing) = self.by_signature.get(ty.signature()) {
            debug!(
                candidate = ty.name(),
                reused = existing.name(),
                "deduplicated structurally equal type"
            );
            return Ok(Rc::clone(existing));
        }

        let candidate = self.rename(ty.name());
        let chosen = if self.is_taken(&candidate) {
            let prefixed = ancestors
                .iter()
                .rev()
                .map(|ancestor| format!("{ancestor}{candidate}"))
                .find(|name| !self.is_taken(name));
            match prefixed {
                Some(name) => {
                    debug!(candidate = %candidate, chosen = %name, "type name collision resolved by ancestor prefix");
                    name
                }
                None => {
                    return Err(GenerateError::NameExhausted {
                        field: candidate,
                        ancestors: ancestors.to_vec(),
                    })
                }
            }
        } else {
            candidate
        };

        ty.set_name(chosen);
        self.add(ty)
    }

    /// Record that a declaration for `ty` has been emitted
    pub fn mark_generated(&mut self, ty: &Type) {
        self.generated.insert(ty.name().to_string());
    }

    pub fn was_generated(&self, ty: &Type) -> bool {
        self.generated.contains(ty.name())
    }

    /// Install a built-in opaque type reachable through a format alias
    pub fn add_builtin(&mut self, alias: &str, ty: Type) -> Rc<Type> {
        let ty = Rc::new(ty);
        self.builtins.insert(alias.to_string(), Rc::clone(&ty));
        ty
    }

    /// Built-in type for a format alias (e.g. `date-time`)
    pub fn builtin(&self, alias: &str) -> Option<Rc<Type>> {
        self.builtins.get(alias).map(Rc::clone)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
