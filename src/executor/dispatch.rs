/// Which path a statement takes through [`crate::SqlJsonBridge::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Update,
}

impl StatementKind {
    /// `insert`, `update` and `delete` at the very start of the text (any case) are
    /// updates; everything else is a query. Leading whitespace and comments are not
    /// skipped.
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        const UPDATE_PREFIXES: [&str; 3] = ["insert", "update", "delete"];
        let is_update = UPDATE_PREFIXES.iter().any(|prefix| {
            sql.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        });
        if is_update {
            StatementKind::Update
        } else {
            StatementKind::Query
        }
    }
}

/// Result of [`crate::SqlJsonBridge::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// JSON rows (or `""` when there was no cursor)
    Rows(String),
    /// Rows affected by a committed update
    Affected(usize),
}
