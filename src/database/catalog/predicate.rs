//! Lookup predicates for id-or-name resolution
//!
//! A `Predicate` is the store-side half of identifier resolution: the name
//! branch is always present, the surrogate id branch only when the token
//! parsed as one. Rendering to SQL only emits the branches that apply.

use rusqlite::types::Value;

/// Lookup predicate matching an entity by name, or by surrogate id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    name: String,
    id: Option<i64>,
}

impl Predicate {
    /// Match on the name column only
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// Match on the name column, or on the id column
    pub fn by_name_or_id(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Render the predicate as a SQL condition
    ///
    /// Parameters are numbered from `first_param`, in the same order as
    /// [`Predicate::params`] returns them.
    pub fn to_sql(&self, name_column: &str, id_column: &str, first_param: usize) -> String {
        match self.id {
            Some(_) => format!(
                "({} = ?{} OR {} = ?{})",
                name_column,
                first_param,
                id_column,
                first_param + 1
            ),
            None => format!("{} = ?{}", name_column, first_param),
        }
    }

    /// Bound values for the SQL rendered by [`Predicate::to_sql`]
    pub fn params(&self) -> Vec<Value> {
        let mut params = vec![Value::Text(self.name.clone())];
        if let Some(id) = self.id {
            params.push(Value::Integer(id));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_sql() {
        let p = Predicate::by_name("Object");
        assert_eq!(p.to_sql("t.name", "t.table_id", 2), "t.name = ?2");
        assert_eq!(p.params(), vec![Value::Text("Object".to_string())]);
    }

    #[test]
    fn test_name_or_id_sql() {
        let p = Predicate::by_name_or_id("1", 1);
        assert_eq!(
            p.to_sql("d.name", "d.db_id", 1),
            "(d.name = ?1 OR d.db_id = ?2)"
        );
        assert_eq!(
            p.params(),
            vec![Value::Text("1".to_string()), Value::Integer(1)]
        );
    }
}
