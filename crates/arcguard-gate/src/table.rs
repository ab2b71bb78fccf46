//! The operation table: every operation's effective declaration, validated
//! once at startup.

use std::collections::{HashMap, HashSet};

use arcguard_registry::PredicateRegistry;

use crate::{
    BoundDeclaration, GateError, OperationSignature, ParameterResolver, PredicateDeclaration,
};

/// One operation in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEntry {
    signature: OperationSignature,
    guard: Option<BoundDeclaration>,
    inherited_from: Option<String>,
}

impl OperationEntry {
    /// The operation's signature.
    pub fn signature(&self) -> &OperationSignature {
        &self.signature
    }

    /// The bound declaration guarding this operation, if any.
    pub fn guard(&self) -> Option<&BoundDeclaration> {
        self.guard.as_ref()
    }

    /// The base operation, if this entry is a variant.
    pub fn inherited_from(&self) -> Option<&str> {
        self.inherited_from.as_deref()
    }
}

/// Collects operations and declarations before validation.
///
/// Nothing is checked until [`build`](Self::build); calls can come in any
/// order.
#[derive(Debug, Default)]
pub struct OperationTableBuilder {
    operations: Vec<OperationSignature>,
    declarations: Vec<(String, PredicateDeclaration)>,
    service_declarations: Vec<(String, PredicateDeclaration)>,
    variants: Vec<(String, String)>,
}

impl OperationTableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operation.
    pub fn operation(mut self, signature: OperationSignature) -> Self {
        self.operations.push(signature);
        self
    }

    /// Guards `operation` with `declaration`.
    ///
    /// Overrides any declaration on the operation's service.
    pub fn declare(
        mut self,
        operation: impl Into<String>,
        declaration: PredicateDeclaration,
    ) -> Self {
        self.declarations.push((operation.into(), declaration));
        self
    }

    /// Guards every operation in `service` that has no declaration of its
    /// own.
    pub fn declare_service(
        mut self,
        service: impl Into<String>,
        declaration: PredicateDeclaration,
    ) -> Self {
        self.service_declarations.push((service.into(), declaration));
        self
    }

    /// Adds `variant` as another implementation of `base`: same signature,
    /// same declaration.
    ///
    /// Variants are resolved in the order they are added, so a variant may
    /// itself serve as the base of a later one.
    pub fn inherit(mut self, variant: impl Into<String>, base: impl Into<String>) -> Self {
        self.variants.push((variant.into(), base.into()));
        self
    }

    /// Validates everything against `registry` and freezes the table.
    ///
    /// # Errors
    ///
    /// The first problem found, in this order:
    /// - [`GateError::DuplicateOperation`] for a repeated operation or a
    ///   variant whose name is taken
    /// - [`GateError::UnknownOperation`] for a declaration on, or a variant
    ///   of, an operation that doesn't exist
    /// - [`GateError::UnknownService`] for a service no operation belongs to
    /// - [`GateError::DuplicateDeclaration`] for a second declaration on
    ///   the same operation or service
    /// - [`GateError::Resolve`] when a declared parameter isn't in the
    ///   operation's signature
    /// - [`GateError::Registry`] when a declared predicate isn't registered
    pub fn build(self, registry: &PredicateRegistry) -> Result<OperationTable, GateError> {
        let mut signatures: HashMap<String, OperationSignature> = HashMap::new();
        let mut order = Vec::with_capacity(self.operations.len());
        for signature in self.operations {
            if signatures.contains_key(&signature.name) {
                return Err(GateError::DuplicateOperation(signature.name));
            }
            order.push(signature.name.clone());
            signatures.insert(signature.name.clone(), signature);
        }

        let services: HashSet<&str> = signatures
            .values()
            .filter_map(|s| s.service.as_deref())
            .collect();

        let mut by_operation = HashMap::new();
        for (operation, declaration) in self.declarations {
            if !signatures.contains_key(&operation) {
                return Err(GateError::UnknownOperation(operation));
            }
            if by_operation.contains_key(&operation) {
                return Err(GateError::DuplicateDeclaration(operation));
            }
            by_operation.insert(operation, declaration);
        }

        let mut by_service = HashMap::new();
        for (service, declaration) in self.service_declarations {
            if !services.contains(service.as_str()) {
                return Err(GateError::UnknownService(service));
            }
            if by_service.contains_key(&service) {
                return Err(GateError::DuplicateDeclaration(service));
            }
            by_service.insert(service, declaration);
        }

        let mut entries = HashMap::with_capacity(signatures.len() + self.variants.len());
        for name in order {
            let Some(signature) = signatures.remove(&name) else {
                continue;
            };
            let declaration = by_operation.get(&name).or_else(|| {
                signature
                    .service
                    .as_ref()
                    .and_then(|service| by_service.get(service))
            });

            let guard = match declaration {
                Some(declaration) => Some(bind_checked(&signature, declaration, registry)?),
                None => {
                    tracing::debug!(operation = %name, "operation is unguarded");
                    None
                }
            };

            entries.insert(
                name,
                OperationEntry {
                    signature,
                    guard,
                    inherited_from: None,
                },
            );
        }

        for (variant, base) in self.variants {
            if entries.contains_key(&variant) {
                return Err(GateError::DuplicateOperation(variant));
            }
            let Some(base_entry) = entries.get(&base) else {
                return Err(GateError::UnknownOperation(base));
            };

            let signature = OperationSignature {
                name: variant.clone(),
                ..base_entry.signature.clone()
            };
            let guard = base_entry.guard.as_ref().map(|g| g.for_operation(&variant));
            tracing::debug!(operation = %variant, %base, "variant inherits declaration");

            entries.insert(
                variant,
                OperationEntry {
                    signature,
                    guard,
                    inherited_from: Some(base),
                },
            );
        }

        let guarded = entries.values().filter(|e| e.guard.is_some()).count();
        tracing::info!(
            operations = entries.len(),
            guarded,
            "operation table built"
        );

        Ok(OperationTable { entries })
    }
}

/// Binds `declaration` to `signature` and makes sure its predicate exists.
fn bind_checked(
    signature: &OperationSignature,
    declaration: &PredicateDeclaration,
    registry: &PredicateRegistry,
) -> Result<BoundDeclaration, GateError> {
    let bound = ParameterResolver::bind(signature, declaration)?;
    registry.lookup(&declaration.predicate_name)?;
    tracing::info!(operation = %signature.name, %declaration, "operation guarded");
    Ok(bound)
}

/// The frozen, validated set of operations.
///
/// Built once by [`OperationTableBuilder::build`]; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct OperationTable {
    entries: HashMap<String, OperationEntry>,
}

impl OperationTable {
    /// Starts a new builder.
    pub fn builder() -> OperationTableBuilder {
        OperationTableBuilder::new()
    }

    /// The entry for `operation`, if it exists.
    pub fn get(&self, operation: &str) -> Option<&OperationEntry> {
        self.entries.get(operation)
    }

    /// The declaration guarding `operation`.
    ///
    /// `Ok(None)` means the operation exists and is unguarded.
    ///
    /// # Errors
    /// [`GateError::UnknownOperation`] if no such operation exists.
    pub fn guard_for(&self, operation: &str) -> Result<Option<&BoundDeclaration>, GateError> {
        self.entries
            .get(operation)
            .map(OperationEntry::guard)
            .ok_or_else(|| GateError::UnknownOperation(operation.to_string()))
    }

    /// Returns `true` if `operation` exists and carries a declaration.
    pub fn is_guarded(&self, operation: &str) -> bool {
        self.entries
            .get(operation)
            .is_some_and(|e| e.guard.is_some())
    }

    /// Number of operations, variants included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no operations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All operation names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// =========================================================================
// Tests
// =========================================================================
