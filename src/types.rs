//! Core types for spark-html.
//!
//! These types describe *what* to render. They are plain, immutable values
//! built by calling code and handed to the renderer, which turns them into a
//! persistent node tree.
//!
//! - [`Value`] - any description: scalars, lists, nested elements
//! - [`Props`] - ordered, string-keyed property map
//! - [`Element`] - a `(type, props)` pair
//! - [`ElementType`] - fragment / raw markup / provider / component / tag

use std::fmt;

use indexmap::IndexMap;

use crate::engine::Component;
use crate::error::{RenderError, Result};

/// Prop key holding nested descriptions.
pub const CHILDREN: &str = "children";

/// Element type string that marks raw, unescaped markup.
pub const UNSAFE_HTML: &str = ":unsafe-html";

// =============================================================================
// Value
// =============================================================================

/// A description value.
///
/// Appears both as a child description (what to render) and as a prop value
/// (what to pass along). `Null`, booleans and the empty string render as
/// nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Renders nothing.
    #[default]
    Null,
    /// Renders nothing; meaningful as a prop value.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Float scalar.
    Float(f64),
    /// String scalar. Empty strings render nothing.
    Str(String),
    /// Sequence of descriptions; flattened arbitrarily deep when rendered.
    List(Vec<Value>),
    /// Keyed map. Only valid as a prop value (e.g. conditional class maps).
    Map(Props),
    /// A nested element.
    Element(Element),
}

impl Value {
    /// Whether this value renders as nothing (null, boolean, empty string).
    pub fn is_void(&self) -> bool {
        match self {
            Value::Null | Value::Bool(_) => true,
            Value::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Loose truthiness, used for conditional class maps and the
    /// `children` check in [`Element::create`]. `""` and `"0"` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty() && s != "0",
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Element(_) => true,
        }
    }

    /// Text form of a scalar, `None` for anything else.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Element(_) => "element",
        }
    }
}

/// Flatten a child description into an ordered list of renderable entries.
///
/// Lists are walked arbitrarily deep; void entries are dropped at every level.
/// Anything that is not a list is treated as a one-element list.
pub fn flatten(description: Value) -> Vec<Value> {
    fn walk(value: Value, out: &mut Vec<Value>) {
        match value {
            Value::List(items) => {
                for item in items {
                    walk(item, out);
                }
            }
            v if v.is_void() => {}
            v => out.push(v),
        }
    }

    let mut out = Vec::new();
    walk(description, &mut out);
    out
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Element> for Value {
    fn from(value: Element) -> Self {
        Value::Element(value)
    }
}

impl From<Props> for Value {
    fn from(value: Props) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Ordered, string-keyed property map.
///
/// Insertion order is preserved; the HTML serializer emits attributes in this
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Props(IndexMap<String, Value>);

impl Props {
    /// Create an empty map.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a prop, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a prop, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The `children` prop, or `Null` when absent.
    pub fn children(&self) -> Value {
        self.get(CHILDREN).cloned().unwrap_or_default()
    }

    /// Whether any key other than `children` is present.
    pub fn has_non_children(&self) -> bool {
        self.keys().any(|k| k != CHILDREN)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Props {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

// =============================================================================
// Element Type
// =============================================================================

/// What kind of element a description is.
#[derive(Clone, PartialEq)]
pub enum ElementType {
    /// The empty-string marker: renders only its children.
    Fragment,
    /// The `:unsafe-html` marker: one child emitted without escaping.
    UnsafeHtml,
    /// Publishes its non-`children` props to descendants.
    Provider,
    /// A user component.
    Component(Component),
    /// An HTML tag name.
    Tag(String),
}

impl ElementType {
    /// Collapse marker strings stored as tag names into their marker variant.
    pub fn normalized(&self) -> ElementType {
        match self {
            ElementType::Tag(name) if name.is_empty() => ElementType::Fragment,
            ElementType::Tag(name) if name == UNSAFE_HTML => ElementType::UnsafeHtml,
            other => other.clone(),
        }
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Fragment => f.write_str("Fragment"),
            ElementType::UnsafeHtml => f.write_str("UnsafeHtml"),
            ElementType::Provider => f.write_str("Provider"),
            ElementType::Component(c) => write!(f, "Component({c:?})"),
            ElementType::Tag(name) => write!(f, "Tag({name:?})"),
        }
    }
}

impl From<&str> for ElementType {
    fn from(name: &str) -> Self {
        match name {
            "" => ElementType::Fragment,
            UNSAFE_HTML => ElementType::UnsafeHtml,
            tag => ElementType::Tag(tag.to_string()),
        }
    }
}

impl From<String> for ElementType {
    fn from(name: String) -> Self {
        ElementType::from(name.as_str())
    }
}

impl From<Component> for ElementType {
    fn from(component: Component) -> Self {
        ElementType::Component(component)
    }
}

// =============================================================================
// Element
// =============================================================================

/// A `(type, props)` description.
///
/// # Example
///
/// ```ignore
/// use spark_html::{el, Element};
///
/// let page = el("div")
///     .prop("class", "card")
///     .child(el("h1").child("Hello"))
///     .child("world");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    ty: ElementType,
    props: Props,
}

impl Element {
    /// Build an element from a type and a complete prop map.
    pub fn new(ty: impl Into<ElementType>, props: Props) -> Self {
        Self {
            ty: ty.into(),
            props,
        }
    }

    /// Build an element from a type, props and positional children.
    ///
    /// Non-empty `children` are stored as a list under `props["children"]`,
    /// replacing a falsy `children` prop. Fails if the props already carry a
    /// truthy `children` entry as well.
    pub fn create(
        ty: impl Into<ElementType>,
        mut props: Props,
        children: Vec<Value>,
    ) -> Result<Self> {
        if !children.is_empty() {
            if props.get(CHILDREN).is_some_and(Value::is_truthy) {
                return Err(RenderError::InvalidArgument(
                    "both props[children] and children are non-empty".into(),
                ));
            }
            props.insert(CHILDREN, Value::List(children));
        }
        Ok(Self::new(ty, props))
    }

    pub fn ty(&self) -> &ElementType {
        &self.ty
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Set a prop.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Append one child to the `children` list.
    ///
    /// An existing non-list `children` prop becomes the first list entry.
    pub fn child(mut self, child: impl Into<Value>) -> Self {
        let children = match self.props.remove(CHILDREN) {
            None | Some(Value::Null) => vec![child.into()],
            Some(Value::List(mut items)) => {
                items.push(child.into());
                items
            }
            Some(existing) => vec![existing, child.into()],
        };
        self.props.insert(CHILDREN, Value::List(children));
        self
    }

    /// Append several children.
    pub fn children<I, V>(self, children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        children.into_iter().fold(self, |el, child| el.child(child))
    }
}

/// Start an element of the given type with no props.
pub fn el(ty: impl Into<ElementType>) -> Element {
    Element::new(ty, Props::new())
}

/// Start a fragment.
pub fn fragment() -> Element {
    el(ElementType::Fragment)
}

/// Start a context provider.
pub fn provider() -> Element {
    el(ElementType::Provider)
}

/// Raw markup emitted without escaping.
pub fn unsafe_html(markup: impl Into<String>) -> Element {
    el(ElementType::UnsafeHtml).child(markup.into())
}
