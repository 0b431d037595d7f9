//! Node Classifier - description in, node blueprint out.
//!
//! ```text
//! null / bool / ""        → nothing
//! 42, 1.5, "text"         → Scalar    props = { value }
//! [a, b, c]               → Fragment  props = { children: [a, b, c] }
//! el("")                  → Fragment  (children only)
//! provider()              → Provider  (publishes non-children props)
//! el(":unsafe-html")      → RawHtml   (exactly one string or number child)
//! el(component)           → Component
//! el("div")               → Tag
//! Map in child position   → error
//! ```

use crate::engine::component::Component;
use crate::engine::node::{NodeFlags, NodeKind, TypeKey};
use crate::error::{RenderError, Result};
use crate::types::{ElementType, Props, Value, CHILDREN};

/// HTML elements that never have an end tag or children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Whether `name` is a void element.
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Everything needed to mount (or match) a node for one description.
#[derive(Debug, Clone)]
pub(crate) struct Blueprint {
    pub kind: NodeKind,
    pub key: TypeKey,
    pub props: Props,
    pub flags: NodeFlags,
    pub component: Option<Component>,
}

impl Blueprint {
    fn new(kind: NodeKind, key: TypeKey, props: Props) -> Self {
        Self {
            kind,
            key,
            props,
            flags: NodeFlags::NONE,
            component: None,
        }
    }
}

/// Classify one description. `Ok(None)` means "render nothing here".
pub(crate) fn classify(description: &Value) -> Result<Option<Blueprint>> {
    let blueprint = match description {
        v if v.is_void() => return Ok(None),

        Value::Int(_) | Value::Float(_) | Value::Str(_) => Blueprint::new(
            NodeKind::Scalar,
            TypeKey::Scalar,
            Props::from([("value", description.clone())]),
        ),

        Value::List(_) => Blueprint::new(
            NodeKind::Fragment,
            TypeKey::Fragment,
            Props::from([(CHILDREN, description.clone())]),
        ),

        Value::Element(element) => classify_element(element.ty(), element.props())?,

        other => {
            return Err(RenderError::Classification(format!(
                "`{}` cannot be rendered as a child",
                other.type_name()
            )));
        }
    };
    Ok(Some(blueprint))
}

fn classify_element(ty: &ElementType, props: &Props) -> Result<Blueprint> {
    let blueprint = match ty.normalized() {
        ElementType::Fragment => {
            if props.has_non_children() {
                return Err(RenderError::StructuralViolation(
                    "fragments cannot have other props than children".into(),
                ));
            }
            Blueprint::new(NodeKind::Fragment, TypeKey::Fragment, props.clone())
        }

        ElementType::Provider => {
            Blueprint::new(NodeKind::Provider, TypeKey::Provider, props.clone())
        }

        ElementType::UnsafeHtml => {
            check_raw_html(props)?;
            Blueprint::new(NodeKind::RawHtml, TypeKey::RawHtml, props.clone())
        }

        ElementType::Component(component) => {
            let mut blueprint = Blueprint::new(
                NodeKind::Component,
                TypeKey::Component(component.key()),
                props.clone(),
            );
            blueprint.component = Some(component);
            blueprint
        }

        ElementType::Tag(name) => {
            let mut blueprint =
                Blueprint::new(NodeKind::Tag, TypeKey::Tag(name.clone()), props.clone());
            if is_void_element(&name) {
                blueprint.flags |= NodeFlags::VOID;
            }
            blueprint
        }
    };
    Ok(blueprint)
}

fn check_raw_html(props: &Props) -> Result<()> {
    if props.has_non_children() {
        return Err(RenderError::StructuralViolation(
            "<:unsafe-html> cannot have other props than children".into(),
        ));
    }
    match props.get(CHILDREN) {
        Some(Value::List(children)) if children.len() != 1 => {
            Err(RenderError::StructuralViolation(format!(
                "<:unsafe-html> must have exactly 1 child, got {}",
                children.len()
            )))
        }
        Some(Value::List(children)) => match &children[0] {
            Value::Str(_) | Value::Int(_) | Value::Float(_) => Ok(()),
            other => Err(RenderError::StructuralViolation(format!(
                "<:unsafe-html> child must be a string or number, got {}",
                other.type_name()
            ))),
        },
        Some(other) => Err(RenderError::StructuralViolation(format!(
            "<:unsafe-html> children must be a list, got {}",
            other.type_name()
        ))),
        None => Err(RenderError::StructuralViolation(
            "<:unsafe-html> must have exactly 1 child, got 0".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Hooks;
    use crate::types::{el, fragment, provider, unsafe_html, Element};

    fn noop(_: &Props, _: &mut Hooks<'_>) -> Result<Value> {
        Ok(Value::Null)
    }

    fn kind_of(value: impl Into<Value>) -> Option<NodeKind> {
        classify(&value.into()).unwrap().map(|b| b.kind)
    }

    #[test]
    fn test_void_descriptions() {
        assert_eq!(kind_of(Value::Null), None);
        assert_eq!(kind_of(true), None);
        assert_eq!(kind_of(false), None);
        assert_eq!(kind_of(""), None);
    }

    #[test]
    fn test_scalars() {
        let blueprint = classify(&Value::from(42)).unwrap().unwrap();
        assert_eq!(blueprint.kind, NodeKind::Scalar);
        assert_eq!(blueprint.props.get("value"), Some(&Value::Int(42)));
        assert_eq!(kind_of(1.5), Some(NodeKind::Scalar));
        assert_eq!(kind_of("0"), Some(NodeKind::Scalar));
    }

    #[test]
    fn test_lists_and_fragments_share_a_key() {
        let list = classify(&Value::from(vec!["a", "b"])).unwrap().unwrap();
        let marker = classify(&fragment().child("a").into()).unwrap().unwrap();
        assert_eq!(list.kind, NodeKind::Fragment);
        assert_eq!(list.key, marker.key);
    }

    #[test]
    fn test_fragment_rejects_props() {
        let err = classify(&fragment().prop("id", "x").into()).unwrap_err();
        assert!(matches!(err, RenderError::StructuralViolation(_)));
    }

    #[test]
    fn test_provider_and_tag() {
        assert_eq!(kind_of(provider().prop("theme", "dark")), Some(NodeKind::Provider));

        let img = classify(&el("img").into()).unwrap().unwrap();
        assert_eq!(img.key, TypeKey::Tag("img".into()));
        assert!(img.flags.contains(NodeFlags::VOID));

        let div = classify(&el("div").into()).unwrap().unwrap();
        assert!(!div.flags.contains(NodeFlags::VOID));
    }

    #[test]
    fn test_component() {
        let blueprint = classify(&el(Component::from_fn(noop)).into()).unwrap().unwrap();
        assert_eq!(blueprint.kind, NodeKind::Component);
        assert_eq!(
            blueprint.key,
            TypeKey::Component(Component::from_fn(noop).key())
        );
        assert!(blueprint.component.is_some());
    }

    #[test]
    fn test_raw_html_shape() {
        assert_eq!(kind_of(unsafe_html("<b>x</b>")), Some(NodeKind::RawHtml));
        assert_eq!(kind_of(unsafe_html("")), Some(NodeKind::RawHtml));
        assert_eq!(kind_of(el(":unsafe-html").child(7)), Some(NodeKind::RawHtml));

        let bad: Vec<Value> = vec![
            el(":unsafe-html").prop("id", "x").child("y").into(),
            Element::new(":unsafe-html", Props::from([(CHILDREN, "bar")])).into(),
            el(":unsafe-html").into(),
            el(":unsafe-html").child("a").child("b").into(),
            el(":unsafe-html").child(el("b")).into(),
            el(":unsafe-html").child(Value::Null).into(),
        ];
        for description in bad {
            let err = classify(&description).unwrap_err();
            assert!(matches!(err, RenderError::StructuralViolation(_)), "{description:?}");
        }
    }

    #[test]
    fn test_map_child_fails() {
        let err = classify(&Value::Map(Props::from([("a", 1)]))).unwrap_err();
        assert!(matches!(err, RenderError::Classification(_)));
    }
}
