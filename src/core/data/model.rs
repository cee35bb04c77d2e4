use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use serde::Serialize;

use super::source::{SourceContext, Span};

/// What a `ForeignKey(...)` points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// `ForeignKey("users.id")`
    Table(String),
    /// `ForeignKey(User.id)`
    Entity(String),
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTarget::Table(table) => write!(f, "{}", table),
            ReferenceTarget::Entity(name) => write!(f, "{}", name),
        }
    }
}

/// A column holding the identifier of another entity's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceField {
    pub name: String,
    pub target: ReferenceTarget,
    pub target_column: String,
    pub context: SourceContext,
    /// Byte offset of the declaration in the file.
    pub offset: usize,
}

/// How a relationship names its reference column explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplicitReference {
    ForeignKeys(String),
    PrimaryJoin(String),
}

/// A `relationship(...)` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipAlias {
    pub name: String,
    /// Target entity class name.
    pub target: String,
    /// `back_populates=` or `backref=` value.
    pub inverse: Option<String>,
    pub explicit: Option<ExplicitReference>,
    /// Association-table relationships (`secondary=`) join through another table.
    pub secondary: bool,
    /// Side declared by the relationship itself: a collection annotation or
    /// `uselist=True` is one-to-many, a scalar one many-to-one. `None` when
    /// the declaration does not say.
    pub direction: Option<Direction>,
    pub context: SourceContext,
    /// Byte offset of the declaration in the file.
    pub offset: usize,
    /// `(` .. `)` of the `relationship` call, inclusive of both parens.
    pub call: Span,
    /// Source text covered by `call`.
    pub call_text: String,
}

impl RelationshipAlias {
    pub fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }
}

/// A declarative model class with a `__tablename__`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub table: String,
    pub file_path: String,
    pub line: usize,
    pub reference_fields: Vec<ReferenceField>,
    pub relationships: Vec<RelationshipAlias>,
}

impl Entity {
    pub fn field(&self, name: &str) -> Option<&ReferenceField> {
        self.reference_fields.iter().find(|f| f.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipAlias> {
        self.relationships.iter().find(|r| r.name == name)
    }
}

/// Which side of the link holds the candidate columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// The declaring entity holds the columns (`post.author`).
    ManyToOne,
    /// The target entity holds the columns (`user.posts`).
    OneToMany,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ManyToOne => write!(f, "many-to-one"),
            Direction::OneToMany => write!(f, "one-to-many"),
        }
    }
}

/// Reference fields that could satisfy a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    pub direction: Direction,
    /// Entity declaring the candidate fields.
    pub holder: String,
    pub fields: BTreeSet<String>,
}

impl CandidateSet {
    pub fn is_ambiguous(&self) -> bool {
        self.fields.len() >= 2
    }
}

/// Catalog of every entity found in the scanned files.
#[derive(Debug, Default)]
pub struct Schema {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
    by_table: HashMap<String, usize>,
}

impl Schema {
    /// Build the catalog. Entities are ordered by file and line; on duplicate
    /// class names the first declaration wins.
    pub fn new(mut entities: Vec<Entity>) -> Self {
        entities.sort_by(|a, b| (&a.file_path, a.line).cmp(&(&b.file_path, b.line)));

        let mut by_name = HashMap::new();
        let mut by_table = HashMap::new();
        for (idx, entity) in entities.iter().enumerate() {
            if by_name.contains_key(&entity.name) {
                log::debug!(
                    "duplicate entity `{}` in {}, keeping first declaration",
                    entity.name,
                    entity.file_path
                );
            }
            by_name.entry(entity.name.clone()).or_insert(idx);
            by_table.entry(entity.table.clone()).or_insert(idx);
        }

        Self {
            entities,
            by_name,
            by_table,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&idx| &self.entities[idx])
    }

    pub fn entity_by_table(&self, table: &str) -> Option<&Entity> {
        self.by_table.get(table).map(|&idx| &self.entities[idx])
    }

    /// Entity a reference field points at, if it was scanned.
    pub fn referenced_entity(&self, field: &ReferenceField) -> Option<&Entity> {
        match &field.target {
            ReferenceTarget::Table(table) => self.entity_by_table(table),
            ReferenceTarget::Entity(name) => self.entity(name),
        }
    }

    /// Reference fields of `holder` that point at `target`, by name.
    pub fn fields_pointing_at(&self, holder: &Entity, target: &Entity) -> BTreeSet<String> {
        holder
            .reference_fields
            .iter()
            .filter(|field| points_at(field, target))
            .map(|field| field.name.clone())
            .collect()
    }

    /// Candidate set for `rel` declared on `declaring`.
    ///
    /// A collection relationship only looks at the target's references back
    /// to the declaring entity, even when the declaring entity also points at
    /// the target. Otherwise the declaring side is tried first, then the
    /// target side (one-to-one with the column on the target). Returns `None`
    /// when the target entity was not scanned or no column links the two.
    pub fn candidates(&self, declaring: &Entity, rel: &RelationshipAlias) -> Option<CandidateSet> {
        let target = self.entity(&rel.target)?;

        let forward = if rel.direction == Some(Direction::OneToMany) {
            BTreeSet::new()
        } else {
            self.fields_pointing_at(declaring, target)
        };
        if !forward.is_empty() {
            return Some(CandidateSet {
                direction: Direction::ManyToOne,
                holder: declaring.name.clone(),
                fields: forward,
            });
        }

        let reverse = self.fields_pointing_at(target, declaring);
        if !reverse.is_empty() {
            return Some(CandidateSet {
                direction: Direction::OneToMany,
                holder: target.name.clone(),
                fields: reverse,
            });
        }

        None
    }

    /// Inverse alias of `rel`: its own `back_populates`/`backref`, otherwise a
    /// relationship on the target whose `back_populates` names `rel`.
    pub fn inverse_of(&self, declaring: &Entity, rel: &RelationshipAlias) -> Option<String> {
        if let Some(inverse) = &rel.inverse {
            return Some(inverse.clone());
        }
        let target = self.entity(&rel.target)?;
        target
            .relationships
            .iter()
            .find(|other| {
                other.target == declaring.name && other.inverse.as_deref() == Some(rel.name.as_str())
            })
            .map(|other| other.name.clone())
    }

    /// A relationship is ambiguous when it names no column explicitly and two
    /// or more columns could carry it.
    pub fn is_ambiguous(&self, declaring: &Entity, rel: &RelationshipAlias) -> bool {
        if rel.is_explicit() || rel.secondary {
            return false;
        }
        self.candidates(declaring, rel)
            .is_some_and(|set| set.is_ambiguous())
    }

    /// Every `(holder, target)` pair linked by two or more reference fields.
    pub fn multi_reference_pairs(&self) -> Vec<(&Entity, &Entity, BTreeSet<String>)> {
        let mut pairs = Vec::new();
        for holder in &self.entities {
            let mut seen: Vec<&str> = Vec::new();
            for field in &holder.reference_fields {
                let Some(target) = self.referenced_entity(field) else {
                    continue;
                };
                if seen.contains(&target.name.as_str()) {
                    continue;
                }
                seen.push(&target.name);
                let fields = self.fields_pointing_at(holder, target);
                if fields.len() >= 2 {
                    pairs.push((holder, target, fields));
                }
            }
        }
        pairs
    }
}

fn points_at(field: &ReferenceField, target: &Entity) -> bool {
    match &field.target {
        ReferenceTarget::Table(table) => *table == target.table,
        ReferenceTarget::Entity(name) => *name == target.name,
    }
}
