//! PostgREST-style filter strings for collection reads.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Lt,
    Gt,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Eq => write!(f, "eq"),
            FilterOp::Lt => write!(f, "lt"),
            FilterOp::Gt => write!(f, "gt"),
        }
    }
}

#[derive(Debug, Clone)]
struct Filter {
    column: String,
    op: FilterOp,
    value: String,
}

/// Builder for `/rest/v1/<collection>?col=op.value&...` paths.
#[derive(Debug, Clone)]
pub struct Query {
    collection: String,
    filters: Vec<Filter>,
    order: Option<String>,
    limit: Option<usize>,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn filter(mut self, column: &str, op: FilterOp, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    pub fn gt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gt, value)
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{}.asc", column));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn collection_path(&self) -> String {
        format!("/rest/v1/{}", self.collection)
    }

    pub fn to_path(&self) -> String {
        let mut parts: Vec<String> = self
            .filters
            .iter()
            .map(|f| format!("{}={}.{}", f.column, f.op, urlencoding::encode(&f.value)))
            .collect();

        if let Some(order) = &self.order {
            parts.push(format!("order={}", order));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={}", limit));
        }

        if parts.is_empty() {
            self.collection_path()
        } else {
            format!("{}?{}", self.collection_path(), parts.join("&"))
        }
    }
}
