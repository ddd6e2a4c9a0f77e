//! Typed, total access into loosely typed resource property maps.
//!
//! Rule predicates read properties through [`PropertyAccessor`] instead of
//! indexing the raw map. Every getter is total: absent values yield the
//! caller's default, and wrong-typed values yield the default plus a recorded
//! [`TypeMismatch`] so the substitution is never silent.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// One step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member lookup.
    Key(String),
    /// Sequence element lookup.
    Index(usize),
}

/// A parsed dotted property path such as `ingress.0.fromPort`.
///
/// Segments made entirely of ASCII digits address sequence elements; every
/// other segment addresses an object member. Parsing never fails: a path
/// that fits no real property simply resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath {
    segments: SmallVec<[PathSegment; 4]>,
}

impl PropertyPath {
    /// Parses a dotted path. Total: any string is a valid path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = path.split('.').map(parse_segment).collect();
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walks the path from `root`, returning the addressed value if every
    /// step lands.
    #[must_use]
    pub fn resolve<'v>(&self, root: &'v Map<String, Value>) -> Option<&'v Value> {
        let mut segments = self.segments.iter();
        let mut current = match segments.next()? {
            PathSegment::Key(key) => root.get(key)?,
            // A leading index addresses an object member spelled as digits.
            PathSegment::Index(idx) => root.get(&idx.to_string())?,
        };
        for segment in segments {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
                (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx)?,
                // Objects keyed by digit strings stay addressable by index.
                (PathSegment::Index(idx), Value::Object(map)) => map.get(&idx.to_string())?,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn parse_segment(raw: &str) -> PathSegment {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(idx) = raw.parse::<usize>() {
            return PathSegment::Index(idx);
        }
    }
    PathSegment::Key(raw.to_string())
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(idx) => write!(f, "{idx}")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Recorded when a typed getter found a value of the wrong shape and
/// substituted the caller's default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMismatch {
    /// The path that was read.
    pub path: String,
    /// Shape the getter asked for.
    pub expected: Cow<'static, str>,
    /// Shape the property actually had.
    pub actual: Cow<'static, str>,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} at `{}`, found {}",
            self.expected, self.path, self.actual
        )
    }
}

/// Read-only view over one resource's property map.
///
/// Getters never panic and never fail the rule that calls them. The
/// missing-versus-wrong-type distinction the defaults paper over is kept in
/// a mismatch log the evaluator attaches to the result:
///
/// ```rust
/// use rampart_policy::props::PropertyAccessor;
/// use serde_json::{json, Map, Value};
///
/// let mut props = Map::new();
/// props.insert("encrypted".into(), json!("yes"));
///
/// let accessor = PropertyAccessor::new(&props);
/// assert!(!accessor.get_bool("encrypted", false)); // wrong type, default
/// assert!(!accessor.get_bool("missing", false)); // absent, default
///
/// let mismatches = accessor.take_mismatches();
/// assert_eq!(mismatches.len(), 1); // only the wrong type was logged
/// assert_eq!(mismatches[0].path, "encrypted");
/// ```
#[derive(Debug)]
pub struct PropertyAccessor<'r> {
    properties: &'r Map<String, Value>,
    mismatches: RefCell<Vec<TypeMismatch>>,
}

impl<'r> PropertyAccessor<'r> {
    #[must_use]
    pub fn new(properties: &'r Map<String, Value>) -> Self {
        Self {
            properties,
            mismatches: RefCell::new(Vec::new()),
        }
    }

    /// Raw lookup. `Some(Value::Null)` means declared-but-null, which is
    /// not the same as absent.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&'r Value> {
        PropertyPath::parse(path).resolve(self.properties)
    }

    /// True when the path resolves to any value, null included.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Boolean at `path`, or `default` when absent or not a boolean.
    #[must_use]
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        match self.get(path) {
            None => default,
            Some(Value::Bool(value)) => *value,
            Some(other) => {
                self.record(path, "boolean", other);
                default
            }
        }
    }

    /// String at `path`, or `default` when absent or not a string.
    ///
    /// The result borrows the property map (or the default), never the
    /// accessor, so callers can keep it across later mutable context use.
    #[must_use]
    pub fn get_str(&self, path: &str, default: &'r str) -> &'r str {
        match self.get(path) {
            None => default,
            Some(Value::String(value)) => value,
            Some(other) => {
                self.record(path, "string", other);
                default
            }
        }
    }

    /// Integer at `path`, or `default` when absent or not coercible.
    ///
    /// Coercion follows [`coerce_i64`]: numbers and strings spelling an
    /// integer both count, so `"fromPort": "22"` compares equal to 22.
    #[must_use]
    pub fn get_i64(&self, path: &str, default: i64) -> i64 {
        match self.get(path) {
            None => default,
            Some(value) => match coerce_i64(value) {
                Some(n) => n,
                None => {
                    self.record(path, "integer", value);
                    default
                }
            },
        }
    }

    /// Sequence at `path`, or the empty slice when absent or not a sequence.
    #[must_use]
    pub fn get_list(&self, path: &str) -> &'r [Value] {
        match self.get(path) {
            None => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(other) => {
                self.record(path, "array", other);
                &[]
            }
        }
    }

    /// Drains every mismatch recorded so far, oldest first.
    #[must_use]
    pub fn take_mismatches(&self) -> Vec<TypeMismatch> {
        self.mismatches.take()
    }

    fn record(&self, path: &str, expected: &'static str, actual: &Value) {
        self.mismatches.borrow_mut().push(TypeMismatch {
            path: path.to_string(),
            expected: Cow::Borrowed(expected),
            actual: Cow::Borrowed(value_type_name(actual)),
        });
    }
}

/// Human-readable name of a JSON value's shape, for diagnostics.
#[must_use]
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lenient integer coercion: numbers (floats truncate) and strings spelling
/// an integer. Everything else is `None`.
#[must_use]
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
