//! Request options and their query-string encoding.
//!
//! The One API shares one query grammar across every resource:
//!
//! - pagination: `limit=<n>&page=<n>&offset=<n>`
//! - sorting: `sort=<field>:<asc|desc>`
//! - filtering, one term per clause: `<field>[!]=<value>`, `<field><op><num>`
//!   or a bare `<field>`
//!
//! [`Options`] describes a request in those terms and [`encode`] turns it into
//! the fragment appended to the request URL. The encoder is purely syntactic:
//! it never checks that a field exists on the resource being queried.
//!
//! # Examples
//!
//! ```
//! use one_api::query::{Direction, Filter, Operator, Options};
//!
//! let options = Options::new()
//!     .limit(10)
//!     .sort(Direction::Descending, "budgetInMillions")
//!     .filter(Filter::compare("budgetInMillions", Operator::Gt, 100.0))
//!     .filter(Filter::not_matching("name", "The Hobbit Series"));
//!
//! assert_eq!(
//!     options.to_query_string(),
//!     "?limit=10&sort=budgetInMillions:desc&budgetInMillions>100&name!=The Hobbit Series"
//! );
//! ```

use std::fmt;

/// Options for a single list or lookup request.
///
/// Every section is optional; an unset section contributes nothing to the
/// query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Paging controls.
    pub pagination: Option<Pagination>,
    /// Result ordering.
    pub sort: Option<Sort>,
    /// Filter clauses, encoded in order.
    pub filters: Vec<Filter>,
}

/// Paging controls. Values of zero are treated as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub page: Option<u64>,
    pub offset: Option<u64>,
}

/// Sort order for a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    pub direction: Option<Direction>,
    pub field: Option<String>,
}

/// Direction of a [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The token the API expects after `sort=<field>:`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// Numeric comparison operators accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Operator {
    /// The operator as written between field and number, e.g. `>=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filter clause.
///
/// A clause can express four kinds of filter, depending on which fields are
/// set:
///
/// | set fields                 | term                   |
/// |----------------------------|------------------------|
/// | `value`                    | `field=value`          |
/// | `value`, `negate`          | `field!=value`         |
/// | `operator`, `comparison_value` | `field<op><number>` |
/// | neither                    | `field`                |
///
/// Values starting with `/` are passed through as regular expressions and
/// comma-separated values as "any of" lists; both use the `=` form. A set
/// `value` always wins over an `operator`. See [`Filter::classify`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub field: Option<String>,
    pub value: Option<String>,
    pub negate: bool,
    pub operator: Option<Operator>,
    pub comparison_value: Option<f64>,
}

/// The single term a [`Filter`] encodes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterTerm<'a> {
    /// `field=value` or `field!=value`. Covers plain matches, regular
    /// expressions and comma-separated lists.
    Match {
        field: &'a str,
        value: &'a str,
        negated: bool,
    },
    /// `field<op><number>`. Never negated.
    Comparison {
        field: &'a str,
        operator: Operator,
        value: Option<f64>,
    },
    /// A bare `field`, asking for documents where the field exists.
    PresenceOnly { field: &'a str },
    /// Nothing is emitted.
    Suppressed,
}

impl Filter {
    /// Creates a clause for `field` with nothing else set, which encodes as
    /// a presence check until a value or operator is added.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    /// `field=value`.
    pub fn matching(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field).value(value)
    }

    /// `field!=value`.
    pub fn not_matching(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::matching(field, value).negate(true)
    }

    /// `field<op><value>`.
    pub fn compare(field: impl Into<String>, operator: Operator, value: f64) -> Self {
        Self::new(field).operator(operator, value)
    }

    /// A bare `field`.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::new(field)
    }

    /// Sets the value to match, making this a `field=value` clause.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Turns `field=value` into `field!=value`. Has no effect on comparisons.
    pub fn negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Sets a numeric comparison, used when no value is set.
    pub fn operator(mut self, operator: Operator, value: f64) -> Self {
        self.operator = Some(operator);
        self.comparison_value = Some(value);
        self
    }

    /// Decides which term this clause encodes to.
    ///
    /// The checks run in a fixed order and the first hit wins:
    ///
    /// 1. no field: [`FilterTerm::Suppressed`]
    /// 2. value is a regex (`/...`), a comma list, or any other value:
    ///    [`FilterTerm::Match`]
    /// 3. operator set: [`FilterTerm::Comparison`]
    /// 4. no value: [`FilterTerm::PresenceOnly`]
    ///
    /// ```
    /// use one_api::query::{Filter, FilterTerm, Operator};
    ///
    /// // A value shadows the operator.
    /// let clause = Filter::compare("runtimeInMinutes", Operator::Gt, 160.0).value("201");
    /// assert!(matches!(clause.classify(), FilterTerm::Match { .. }));
    /// ```
    pub fn classify(&self) -> FilterTerm<'_> {
        let Some(field) = self.field.as_deref() else {
            return FilterTerm::Suppressed;
        };
        let value = self.value.as_deref();

        let is_regex = value.is_some_and(|v| v.starts_with('/'));
        let is_multi_value = value.is_some_and(|v| v.contains(','));
        let is_simple_match = value.is_some() && !is_multi_value;

        if is_regex || is_simple_match || is_multi_value {
            if let Some(value) = value {
                return FilterTerm::Match {
                    field,
                    value,
                    negated: self.negate,
                };
            }
        }

        if let Some(operator) = self.operator {
            return FilterTerm::Comparison {
                field,
                operator,
                value: self.comparison_value,
            };
        }

        match value {
            None => FilterTerm::PresenceOnly { field },
            Some(_) => FilterTerm::Suppressed,
        }
    }
}

impl fmt::Display for FilterTerm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterTerm::Match {
                field,
                value,
                negated,
            } => {
                let bang = if *negated { "!" } else { "" };
                write!(f, "{field}{bang}={value}")
            }
            FilterTerm::Comparison {
                field,
                operator,
                value: Some(value),
            } => write!(f, "{field}{operator}{}", JsNumber(*value)),
            // Best effort: an operator without a number still names the field.
            FilterTerm::Comparison {
                field,
                operator,
                value: None,
            } => write!(f, "{field}{operator}"),
            FilterTerm::PresenceOnly { field } => f.write_str(field),
            FilterTerm::Suppressed => Ok(()),
        }
    }
}

impl Options {
    /// Creates empty options, which encode to an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = Some(limit);
        self
    }

    /// Sets the 1-indexed page number.
    pub fn page(mut self, page: u64) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).page = Some(page);
        self
    }

    /// Sets how many documents to skip.
    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).offset = Some(offset);
        self
    }

    /// Sorts by `field`.
    pub fn sort(mut self, direction: Direction, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            direction: Some(direction),
            field: Some(field.into()),
        });
        self
    }

    /// Appends a filter clause.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Encodes these options as a URL query fragment.
    ///
    /// Returns an empty string when nothing would be emitted, otherwise a
    /// string starting with `?`.
    pub fn to_query_string(&self) -> String {
        let mut query = QueryString::default();

        if let Some(pagination) = &self.pagination {
            for (name, value) in [
                ("limit", pagination.limit),
                ("page", pagination.page),
                ("offset", pagination.offset),
            ] {
                if let Some(value) = value.filter(|v| *v > 0) {
                    query.push(format_args!("{name}={value}"));
                }
            }
        }

        if let Some(Sort {
            direction: Some(direction),
            field: Some(field),
        }) = &self.sort
        {
            if !field.is_empty() {
                query.push(format_args!("sort={field}:{}", direction.as_str()));
            }
        }

        for filter in &self.filters {
            let term = filter.classify();
            if term != FilterTerm::Suppressed {
                query.push(term);
            }
        }

        query.finish()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Encodes optional request options. `None` encodes to an empty string.
///
/// ```
/// use one_api::query::{encode, Options};
///
/// assert_eq!(encode(None), "");
/// assert_eq!(encode(Some(&Options::new().limit(10).page(0))), "?limit=10");
/// ```
pub fn encode(options: Option<&Options>) -> String {
    options.map(Options::to_query_string).unwrap_or_default()
}

/// Spells a number the way JavaScript's `String(number)` does, which is what
/// the API parses: `Infinity` rather than `inf`, `0` for negative zero.
struct JsNumber(f64);

impl fmt::Display for JsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n == f64::INFINITY {
            f.write_str("Infinity")
        } else if n == f64::NEG_INFINITY {
            f.write_str("-Infinity")
        } else if n == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{n}")
        }
    }
}

/// Accumulates `?`/`&`-delimited terms.
#[derive(Default)]
struct QueryString {
    buf: String,
}

impl QueryString {
    fn push(&mut self, term: impl fmt::Display) {
        use fmt::Write;

        self.buf.push(if self.buf.is_empty() { '?' } else { '&' });
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{term}");
    }

    fn finish(self) -> String {
        self.buf
    }
}
