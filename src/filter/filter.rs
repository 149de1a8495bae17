use serde_json::{json, Value};

use super::error::FilterError;
use super::row_filter::RowFilter;
use super::types::{FilterData, FilterOp};

/// Caller query for one collection, narrowed by access filters
pub struct Filter {
    collection: String,
    select_fields: Vec<String>,
    where_data: Option<Value>,
    order: Option<Value>,
    limit: Option<i32>,
    offset: Option<i32>,
    access_filters: Vec<RowFilter>,
}

impl Filter {
    pub fn new(collection: impl Into<String>) -> Result<Self, FilterError> {
        let collection = collection.into();
        Self::validate_collection_name(&collection)?;
        Ok(Self {
            collection,
            select_fields: vec![],
            where_data: None,
            order: None,
            limit: None,
            offset: None,
            access_filters: vec![],
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(select) = data.select { self.select(select)?; }
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order = Some(order); }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        Ok(self)
    }

    pub fn select(&mut self, fields: Vec<String>) -> Result<&mut Self, FilterError> {
        for field in &fields {
            Self::validate_field_name(field)?;
        }
        self.select_fields = fields;
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        match conditions {
            Value::Null => self.where_data = None,
            Value::Object(_) => self.where_data = Some(conditions),
            _ => return Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
        Ok(self)
    }

    pub fn limit(&mut self, limit: i32, offset: Option<i32>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if let Some(off) = offset { if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); } }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    /// Add an access constraint; every constraint must hold
    pub fn restrict(&mut self, filter: RowFilter) -> &mut Self {
        tracing::debug!("Restricting {} query with access filter {}", self.collection, filter);
        self.access_filters.push(filter);
        self
    }

    /// Combined query: caller WHERE and access filters joined under `$and`
    pub fn to_filter_data(&self) -> FilterData {
        let mut clauses: Vec<Value> = Vec::new();
        if let Some(ref where_data) = self.where_data {
            clauses.push(where_data.clone());
        }
        clauses.extend(self.access_filters.iter().map(RowFilter::to_where));

        let where_clause = match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(json!({ FilterOp::And.key(): clauses })),
        };

        FilterData {
            select: if self.select_fields.is_empty() { None } else { Some(self.select_fields.clone()) },
            where_clause,
            order: self.order.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }

    fn validate_collection_name(name: &str) -> Result<(), FilterError> {
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidCollectionName(format!("Invalid collection name format: {}", name)));
        }
        Ok(())
    }

    fn validate_field_name(name: &str) -> Result<(), FilterError> {
        if name == "*" { return Ok(()); }
        if !Self::is_identifier(name) {
            return Err(FilterError::InvalidField(format!("Invalid field name format: {}", name)));
        }
        Ok(())
    }

    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}
