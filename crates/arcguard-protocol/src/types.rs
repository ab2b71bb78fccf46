//! Core data types shared by every Arcguard layer.
//!
//! These are the values that cross the library boundary: the identifiers a
//! guarded call talks about, the actual arguments of that call, the
//! arguments projected out for a predicate, and the response a rejected
//! caller sees.

// Serde derives let the manifest loader and the demo decode these types
// straight from JSON.
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// A "newtype wrapper" around `u64`: a `GameId` can never be passed where a
/// `PlayerId` is expected, even though both are plain numbers underneath.
///
/// `#[serde(transparent)]` serializes `PlayerId(42)` as just `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// `tracing::info!(%player_id, "...")` prints "P-42".
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a game (one match that players join).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ArgValue — one actual argument of a call
// ---------------------------------------------------------------------------

/// A single actual argument value passed to a guarded operation.
///
/// The gate never interprets these values; it only projects them by
/// position. Predicates read them back through the typed accessors
/// ([`ArgValue::as_id`], [`ArgValue::as_str`], ...).
///
/// The JSON form is just the bare value: `null`, `true`, `42`, `"42"`,
/// `[1, 2]`. `42` becomes `Int` and `"42"` becomes `Text`. A number above
/// `i64::MAX` decodes to its decimal `Text`, the same form
/// `ArgValue::from(u64)` produces, so `as_id` reads it back either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// No value (an optional argument that was omitted).
    Null,

    /// A boolean flag.
    Bool(bool),

    /// A signed integer. Identifiers are carried as non-negative ints.
    Int(i64),

    /// A string. Path variables usually arrive in this form, even when
    /// they hold a number.
    Text(String),

    /// A list of values (e.g., a request body carrying several roles).
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Reads this value as a numeric identifier.
    ///
    /// Accepts a non-negative `Int`, or a `Text` holding a decimal number
    /// (surrounding whitespace is not accepted). Everything else is `None`.
    pub fn as_id(&self) -> Option<u64> {
        match self {
            Self::Int(n) => u64::try_from(*n).ok(),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List` value.
    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl<'de> Deserialize<'de> for ArgValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ArgValueVisitor)
    }
}

struct ArgValueVisitor;

impl<'de> Visitor<'de> for ArgValueVisitor {
    type Value = ArgValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a boolean, an integer, a string, or a list of those")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ArgValue, E> {
        Ok(ArgValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ArgValue, E> {
        Ok(ArgValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ArgValue, D::Error> {
        ArgValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<ArgValue, E> {
        Ok(ArgValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ArgValue, E> {
        Ok(ArgValue::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ArgValue, E> {
        Ok(ArgValue::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ArgValue, E> {
        Ok(ArgValue::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<ArgValue, E> {
        Ok(ArgValue::Text(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ArgValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ArgValue::List(items))
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Values above `i64::MAX` don't fit `Int`, so they are kept as their
/// decimal text. `as_id` reads both forms back to the same `u64`.
impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(value.to_string()),
        }
    }
}

impl From<PlayerId> for ArgValue {
    fn from(value: PlayerId) -> Self {
        Self::from(value.0)
    }
}

impl From<GameId> for ArgValue {
    fn from(value: GameId) -> Self {
        Self::from(value.0)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// CallArguments — the actual arguments of one call
// ---------------------------------------------------------------------------

/// The positional actual arguments of one call to a guarded operation.
///
/// Position `i` corresponds to the operation's `i`-th formal parameter.
///
/// ```rust
/// use arcguard_protocol::{ArgValue, CallArguments, GameId, PlayerId};
///
/// let args = CallArguments::new()
///     .arg(GameId(1))
///     .arg(PlayerId(7))
///     .arg(vec!["ECHO", "PEUPLE"]);
///
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get(1), Some(&ArgValue::Int(7)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallArguments(Vec<ArgValue>);

impl CallArguments {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an argument (builder style).
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.0.push(value.into());
        self
    }

    /// Appends an argument in place.
    pub fn push(&mut self, value: impl Into<ArgValue>) {
        self.0.push(value.into());
    }

    /// Returns the argument at `position`, if the call carried one.
    pub fn get(&self, position: usize) -> Option<&ArgValue> {
        self.0.get(position)
    }

    /// Number of actual arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the call carried no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the arguments in positional order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArgValue> {
        self.0.iter()
    }
}

impl From<Vec<ArgValue>> for CallArguments {
    fn from(values: Vec<ArgValue>) -> Self {
        Self(values)
    }
}

impl FromIterator<ArgValue> for CallArguments {
    fn from_iter<I: IntoIterator<Item = ArgValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// ResolvedArguments — what a predicate sees
// ---------------------------------------------------------------------------

/// The arguments a predicate receives, keyed by declared parameter name.
///
/// Built fresh for every call by the parameter resolver. Entries keep the
/// order of the declaration's parameter names, and every declared name is
/// present (resolution fails otherwise), so predicates can treat a missing
/// name as a wiring bug rather than a normal case.
///
/// A `Vec` of pairs instead of a `HashMap`: declarations name two or three
/// parameters, and a linear scan over that is faster than hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArguments {
    entries: Vec<(String, ArgValue)>,
}

impl ResolvedArguments {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) the value bound to `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Returns the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Reads `name` as a numeric identifier (see [`ArgValue::as_id`]).
    pub fn id(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(ArgValue::as_id)
    }

    /// Reads `name` as a [`PlayerId`].
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.id(name).map(PlayerId)
    }

    /// Reads `name` as a [`GameId`].
    pub fn game_id(&self, name: &str) -> Option<GameId> {
        self.id(name).map(GameId)
    }

    /// Returns `true` if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AccessDenied — the caller-visible rejection
// ---------------------------------------------------------------------------

/// HTTP-style status code carried by every rejection.
pub const ACCESS_DENIED_CODE: u16 = 403;

/// The response a caller receives when a guarded call is rejected.
///
/// Deliberately uninformative: whether the game didn't exist, the player
/// belonged to someone else, or the predicate crashed, the caller sees the
/// same `403 access denied`. The detailed reason stays in the server logs
/// unless the guard is configured to expose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDenied {
    /// Always [`ACCESS_DENIED_CODE`].
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl AccessDenied {
    /// The opaque rejection: `403 access denied`.
    pub fn new() -> Self {
        Self {
            code: ACCESS_DENIED_CODE,
            message: "access denied".to_string(),
        }
    }

    /// A rejection that includes the internal reason. Only for setups that
    /// explicitly allow leaking it (development, internal tooling).
    pub fn with_reason(reason: impl fmt::Display) -> Self {
        Self {
            code: ACCESS_DENIED_CODE,
            message: format!("access denied: {reason}"),
        }
    }
}

impl Default for AccessDenied {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

// =========================================================================
// Tests
// =========================================================================
