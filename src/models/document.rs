use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use uuid::Uuid;

use crate::error::AppResult;

/// A schemaless record stored in a document collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            updated_at: None,
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Decodes the document (including `$id`) into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Identifier requested for a new document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentId {
    /// Let the store generate the id
    Unique,
    Custom(String),
}

impl DocumentId {
    /// Generates a fresh client-side id
    pub fn generate() -> Self {
        DocumentId::Custom(Uuid::new_v4().simple().to_string())
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Unique => write!(f, "unique()"),
            DocumentId::Custom(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

/// A single `(field, operator, value)` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered filters plus optional sort and limit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub filters: Vec<Filter>,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn equal(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Equal, value)
    }

    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Any,
    User(String),
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Any => write!(f, "any"),
            Role::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Document-level permission granted on create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Read(Role),
    Update(Role),
    Delete(Role),
}

impl Permission {
    /// Read, update and delete rights for a single user
    pub fn owner(user_id: &str) -> Vec<Permission> {
        let role = Role::User(user_id.to_string());
        vec![
            Permission::Read(role.clone()),
            Permission::Update(role.clone()),
            Permission::Delete(role),
        ]
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Read(role) => write!(f, "read(\"{}\")", role),
            Permission::Update(role) => write!(f, "update(\"{}\")", role),
            Permission::Delete(role) => write!(f, "delete(\"{}\")", role),
        }
    }
}
