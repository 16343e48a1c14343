//! Optional state/district filter shared by every dashboard read.
//!
//! Predicates are composed with a [`QueryBuilder`] so values are always bound,
//! never spliced into SQL text. State and district are applied independently;
//! nothing checks that a district actually belongs to the given state.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

// ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionFilter {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

/// Column names the filter binds against for a given table alias.
#[derive(Debug, Clone, Copy)]
pub struct RegionColumns {
    pub state: &'static str,
    pub district: &'static str,
}

impl RegionColumns {
    pub const VILLAGE: Self = Self {
        state: "v.state",
        district: "v.district",
    };

    pub const TANKER: Self = Self {
        state: "t.assigned_state",
        district: "t.assigned_district",
    };
}

impl RegionFilter {
    // ---
    pub fn new(state: Option<&str>, district: Option<&str>) -> Self {
        Self {
            state: state.map(str::to_string),
            district: district.map(str::to_string),
        }
    }

    /// State bound, or `None` when absent or blank.
    pub fn state(&self) -> Option<&str> {
        non_blank(self.state.as_deref())
    }

    /// District bound, or `None` when absent or blank.
    pub fn district(&self) -> Option<&str> {
        non_blank(self.district.as_deref())
    }

    /// Append `col = ?` predicates for every present bound.
    ///
    /// `has_where` says whether the query already carries a `WHERE` clause;
    /// the first predicate opens one if not, later predicates join with `AND`.
    pub fn push_predicates(
        &self,
        qb: &mut QueryBuilder<'_, Sqlite>,
        cols: RegionColumns,
        has_where: bool,
    ) {
        // ---
        let mut has_where = has_where;
        let bounds = [(cols.state, self.state()), (cols.district, self.district())];

        for (column, value) in bounds {
            let Some(value) = value else { continue };
            qb.push(if has_where { " AND " } else { " WHERE " });
            qb.push(column);
            qb.push(" = ");
            qb.push_bind(value.to_string());
            has_where = true;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
