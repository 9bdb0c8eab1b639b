use rowmap_core::schema::ResultMap;

use std::collections::HashMap;

/// Identifies the statement a result set came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// A configured statement, by its fully qualified id
    Named(String),

    /// An ad-hoc statement, by its rendered SQL
    Sql(String),
}

impl Statement {
    /// Stable identity of the statement, used to key cached mappers.
    pub fn identity(&self) -> &str {
        match self {
            Self::Named(id) => id,
            Self::Sql(sql) => sql,
        }
    }
}

/// What the caller knows about the query whose rows are being mapped.
#[derive(Debug, Clone)]
pub struct Request {
    pub statement: Statement,

    /// Configured result maps, by result set position
    pub result_maps: HashMap<usize, ResultMap>,

    /// Produce instances that track changes made after mapping
    pub change_tracking: bool,
}

impl Request {
    pub fn new(statement: Statement) -> Self {
        Self {
            statement,
            result_maps: HashMap::new(),
            change_tracking: false,
        }
    }

    pub fn named(id: impl Into<String>) -> Self {
        Self::new(Statement::Named(id.into()))
    }

    pub fn sql(sql: impl Into<String>) -> Self {
        Self::new(Statement::Sql(sql.into()))
    }

    /// Sets the result map for the first result set.
    pub fn result_map(self, map: ResultMap) -> Self {
        self.result_map_at(0, map)
    }

    /// Sets the result map for the result set at `index`.
    pub fn result_map_at(mut self, index: usize, map: ResultMap) -> Self {
        self.result_maps.insert(index, map);
        self
    }

    pub fn change_tracking(mut self, enable: bool) -> Self {
        self.change_tracking = enable;
        self
    }

    /// The result map for the result set at `result_index`, if configured.
    pub fn current_result_map(&self, result_index: usize) -> Option<&ResultMap> {
        self.result_maps.get(&result_index)
    }
}
