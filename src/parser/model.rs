// Parsed data model for save files
// Represents edicts, their expressions, and the two edict pools

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value_type::ValueType;

/// Flat string-to-string lookup table sourced from the Dict section.
pub type Dictionary = IndexMap<String, String>;

/// Left/right pair of typed raw values attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    left_type: ValueType,
    left_value: String,
    right_type: ValueType,
    right_value: String,
}

impl Expression {
    pub fn new(
        left_type: ValueType,
        left_value: impl Into<String>,
        right_type: ValueType,
        right_value: impl Into<String>,
    ) -> Self {
        Self {
            left_type,
            left_value: left_value.into(),
            right_type,
            right_value: right_value.into(),
        }
    }

    /// Placeholder emitted for bodies that carry no parseable expressions.
    pub fn unset() -> Self {
        Self::new(ValueType::Unset, "", ValueType::Unset, "")
    }

    pub fn left_type(&self) -> ValueType {
        self.left_type
    }

    pub fn left_value(&self) -> &str {
        &self.left_value
    }

    pub fn right_type(&self) -> ValueType {
        self.right_type
    }

    pub fn right_value(&self) -> &str {
        &self.right_value
    }

    /// True iff both sides match their type's validity pattern.
    pub fn is_valid(&self) -> bool {
        self.left_type.validator().is_match(&self.left_value)
            && self.right_type.validator().is_match(&self.right_value)
    }
}

/// Which pool a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Entity,
    Constraint,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Entity => "Entity",
            RecordKind::Constraint => "Constraint",
        }
    }
}

/// A uniquely identified node in the record graph, either an entity or a
/// constraint, carrying an ordered list of expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: String,
    kind: RecordKind,
    expressions: Vec<Expression>,
}

impl Record {
    pub fn new(id: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            id: id.into(),
            kind,
            expressions: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn is_entity(&self) -> bool {
        self.kind == RecordKind::Entity
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn add_expression(&mut self, expr: Expression) {
        self.expressions.push(expr);
    }

    /// Rename affordance for interactive correction. The core pipeline never
    /// calls this; collections are keyed by id, so callers re-inserting a
    /// renamed record own the key update.
    pub fn set_id(&mut self, new_id: impl Into<String>) {
        self.id = new_id.into();
    }
}

/// Head-candidate rule: ids starting with `H` nominate themselves as the
/// head of their pool. Kept as a predicate so the convention can change in
/// one place.
pub fn is_head_candidate(id: &str) -> bool {
    id.starts_with('H')
}

/// The two insertion-ordered edict pools plus their optional heads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordCollection {
    entities: IndexMap<String, Record>,
    head_entity_id: Option<String>,
    constraints: IndexMap<String, Record>,
    head_constraint_id: Option<String>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Record> {
        self.entities.values()
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Record> {
        self.constraints.values()
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn constraint_ids(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }

    pub fn head_entity_id(&self) -> Option<&str> {
        self.head_entity_id.as_deref()
    }

    pub fn head_constraint_id(&self) -> Option<&str> {
        self.head_constraint_id.as_deref()
    }

    pub fn head_entity(&self) -> Option<&Record> {
        self.head_entity_id
            .as_deref()
            .and_then(|id| self.entities.get(id))
    }

    pub fn head_constraint(&self) -> Option<&Record> {
        self.head_constraint_id
            .as_deref()
            .and_then(|id| self.constraints.get(id))
    }

    /// Look up an edict by id. Entities are checked first, so an entity
    /// shadows a constraint sharing its id.
    pub fn get_edict(&self, id: &str) -> Option<&Record> {
        self.entities.get(id).or_else(|| self.constraints.get(id))
    }

    pub(crate) fn set_entities(
        &mut self,
        entities: IndexMap<String, Record>,
        head_id: Option<String>,
    ) {
        self.entities = entities;
        self.head_entity_id = head_id;
    }

    pub(crate) fn set_constraints(
        &mut self,
        constraints: IndexMap<String, Record>,
        head_id: Option<String>,
    ) {
        self.constraints = constraints;
        self.head_constraint_id = head_id;
    }
}
