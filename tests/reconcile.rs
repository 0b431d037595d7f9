//! Reconciler and hook behavior across re-renders.
//!
//! Re-renders are only ever triggered from inside a pass: a state setter
//! called from an effect marks its node dirty and the rerender queue settles
//! it before `render` returns. The tests below drive that loop with small
//! closure components that write to a shared log.
//!
//! Run with: cargo test --test reconcile

use std::cell::RefCell;
use std::rc::Rc;

use spark_html::*;

// =============================================================================
// HELPERS
// =============================================================================

type Log = Rc<RefCell<Vec<String>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn cleanup(log: &Log, entry: impl Into<String>) -> Cleanup {
    let log = log.clone();
    let entry = entry.into();
    Box::new(move || log.borrow_mut().push(entry))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// SETTLING
// =============================================================================

#[test]
fn test_effect_state_is_visible_in_output() {
    fn greeting(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        let (text, set_text) = hooks.use_state("foo".to_string())?;
        hooks.use_effect(ONCE, move || set_text.set("bar".to_string()))?;
        Ok(text.into())
    }

    init_tracing();
    assert_eq!(
        render_to_string(el(Component::from_fn(greeting))).unwrap(),
        "bar"
    );
}

#[test]
fn test_setter_update() {
    fn counter(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        let (items, set_items) = hooks.use_state(vec!["a".to_string()])?;
        hooks.use_effect(ONCE, move || set_items.update(|items| items.push("b".into())))?;
        Ok(el("span").child(items.join(",")).into())
    }

    assert_eq!(
        render_to_string(el(Component::from_fn(counter))).unwrap(),
        "<span>a,b</span>"
    );
}

#[test]
fn test_component_rendering_nothing_keeps_state() {
    let seen = log();
    let record = seen.clone();
    let hidden = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (count, set_count) = hooks.use_state(0i64)?;
        record.borrow_mut().push(count.to_string());
        hooks.use_effect(Some(count), move || {
            if count < 2 {
                set_count.set(count + 1);
            }
        })?;
        Ok(Value::Null)
    });

    let tree = render(el(hidden)).unwrap();
    let root = tree.root().unwrap();
    assert!(tree.children(root).is_empty());
    assert_eq!(entries(&seen), ["0", "1", "2"]);
}

// =============================================================================
// IDENTITY
// =============================================================================

#[test]
fn test_same_type_reuses_node_and_state() {
    let seen = log();
    let record = seen.clone();
    let child = Component::from_closure(move |props: &Props, hooks: &mut Hooks<'_>| {
        let (mounted_as, _) = hooks.use_state(props.get("label").cloned().unwrap_or_default())?;
        let label = props.get("label").and_then(Value::to_text).unwrap_or_default();
        record.borrow_mut().push(format!(
            "{}:{label}:{}",
            hooks.node().get(),
            mounted_as.to_text().unwrap_or_default()
        ));
        Ok(label.into())
    });

    let parent = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (label, set_label) = hooks.use_state("a")?;
        hooks.use_effect(ONCE, move || set_label.set("b"))?;
        Ok(el("div").child(el(child.clone()).prop("label", label)).into())
    });

    let tree = render(el(parent)).unwrap();
    let log = entries(&seen);
    assert_eq!(log.len(), 2);

    let ids: Vec<_> = log.iter().map(|e| e.split(':').next().unwrap().to_string()).collect();
    assert_eq!(ids[0], ids[1], "node id is preserved");
    assert!(log[0].ends_with(":a:a"));
    assert!(log[1].ends_with(":b:a"), "state from the first mount survives");
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_same_tag_keeps_id_with_new_props() {
    let counter = Component::from_closure(|_: &Props, hooks: &mut Hooks<'_>| {
        let (n, set_n) = hooks.use_state(0i64)?;
        hooks.use_effect(ONCE, move || set_n.set(1))?;
        Ok(el("div").prop("data-n", n).into())
    });

    let tree = render(el(counter)).unwrap();
    let root = tree.root().unwrap();
    let [div] = tree.children(root) else {
        panic!("expected one child");
    };

    assert_eq!(div.get(), root.get() + 1, "the first div is never replaced");
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.node(*div).unwrap().props().get("data-n"), Some(&Value::Int(1)));
    assert!(tree.node(root).unwrap().flags().contains(NodeFlags::INVOKED));
    assert!(!tree.node(*div).unwrap().flags().contains(NodeFlags::INVOKED));
    assert_eq!(
        HtmlSerializer::new().serialize(&tree).unwrap(),
        r#"<div data-n="1"></div>"#
    );
}

#[test]
fn test_type_change_replaces_node() {
    let seen = log();

    let record = seen.clone();
    let first = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (marker, _) = hooks.use_state("first")?;
        let id = hooks.node().get();
        let log = record.clone();
        hooks.use_effect(ONCE, move || cleanup(&log, format!("cleanup first #{id}")))?;
        Ok(marker.into())
    });

    let record = seen.clone();
    let second = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (marker, _) = hooks.use_state("second")?;
        record.borrow_mut().push(format!("mount second #{}", hooks.node().get()));
        Ok(marker.into())
    });

    let parent = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (swapped, set_swapped) = hooks.use_state(false)?;
        hooks.use_effect(ONCE, move || set_swapped.set(true))?;
        let child = if swapped { second.clone() } else { first.clone() };
        Ok(el(child).into())
    });

    let html = render_to_string(el(parent)).unwrap();
    assert_eq!(html, "second");

    let log = entries(&seen);
    assert_eq!(log.len(), 2);
    assert!(log[0].starts_with("cleanup first #"));
    assert!(log[1].starts_with("mount second #"));
    assert_ne!(
        log[0].rsplit('#').next(),
        log[1].rsplit('#').next(),
        "a new id is assigned"
    );
}

// =============================================================================
// HOOK ORDER
// =============================================================================

#[test]
fn test_conditional_hook_is_an_ordering_violation() {
    fn unstable(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        let (extra, set_extra) = hooks.use_state(false)?;
        if extra {
            hooks.use_memo(EVERY_RENDER, || 1)?;
        }
        hooks.use_effect(ONCE, move || set_extra.set(true))?;
        Ok(Value::Null)
    }

    let err = render(el(Component::from_fn(unstable))).unwrap_err();
    assert!(matches!(err, RenderError::OrderingViolation(_)), "{err}");
    assert!(err.is_hook_error());
}

#[test]
fn test_skipped_hook_is_an_ordering_violation() {
    fn shrinking(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        let (done, set_done) = hooks.use_state(false)?;
        if !done {
            hooks.use_effect(ONCE, move || set_done.set(true))?;
        }
        Ok(Value::Null)
    }

    let err = render(el(Component::from_fn(shrinking))).unwrap_err();
    assert!(matches!(err, RenderError::OrderingViolation(_)), "{err}");
}

#[test]
fn test_context_key_must_match_on_replay() {
    fn switching(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        let (second, set_second) = hooks.use_state(false)?;
        let key = if second { "b" } else { "a" };
        hooks.use_context(key)?;
        hooks.use_effect(ONCE, move || set_second.set(true))?;
        Ok(Value::Null)
    }

    let description = provider()
        .prop("a", 1)
        .prop("b", 2)
        .child(el(Component::from_fn(switching)));
    let err = render(description).unwrap_err();
    assert!(matches!(err, RenderError::OrderingViolation(_)), "{err}");
}

// =============================================================================
// EFFECTS
// =============================================================================

#[test]
fn test_effect_dependency_policy() {
    let seen = log();
    let record = seen.clone();
    let component = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (count, set_count) = hooks.use_state(0i64)?;

        let log = record.clone();
        hooks.use_effect(ONCE, move || log.borrow_mut().push("once".into()))?;

        let log = record.clone();
        hooks.use_effect(EVERY_RENDER, move || log.borrow_mut().push("always".into()))?;

        let log = record.clone();
        hooks.use_effect(Some(count / 2), move || {
            log.borrow_mut().push(format!("half {}", count / 2))
        })?;

        hooks.use_effect(EVERY_RENDER, move || {
            if count < 3 {
                set_count.set(count + 1);
            }
        })?;
        Ok(count.into())
    });

    assert_eq!(render_to_string(el(component)).unwrap(), "3");

    let log = entries(&seen);
    let count = |entry: &str| log.iter().filter(|e| e.as_str() == entry).count();
    assert_eq!(count("once"), 1);
    assert_eq!(count("always"), 4);
    assert_eq!(count("half 0"), 1);
    assert_eq!(count("half 1"), 1);
}

#[test]
fn test_effects_run_before_children() {
    let seen = log();

    let record = seen.clone();
    let child = Component::from_closure(move |_: &Props, _: &mut Hooks<'_>| {
        record.borrow_mut().push("child body".into());
        Ok(Value::Null)
    });

    let record = seen.clone();
    let parent = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let log = record.clone();
        hooks.use_effect(ONCE, move || log.borrow_mut().push("parent effect 1".into()))?;
        let log = record.clone();
        hooks.use_effect(ONCE, move || log.borrow_mut().push("parent effect 2".into()))?;
        record.borrow_mut().push("parent body".into());
        Ok(el(child.clone()).into())
    });

    render(el(parent)).unwrap();
    assert_eq!(
        entries(&seen),
        ["parent body", "parent effect 1", "parent effect 2", "child body"]
    );
}

#[test]
fn test_memo_follows_dependencies() {
    let computed = log();
    let record = computed.clone();
    let component = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (count, set_count) = hooks.use_state(0i64)?;
        let log = record.clone();
        let doubled = hooks.use_memo(Some(count / 2), move || {
            log.borrow_mut().push(format!("memo {count}"));
            count * 2
        })?;
        hooks.use_effect(EVERY_RENDER, move || {
            if count < 3 {
                set_count.set(count + 1);
            }
        })?;
        Ok(doubled.into())
    });

    // count 3 reuses the value memoized at count 2
    assert_eq!(render_to_string(el(component)).unwrap(), "4");
    assert_eq!(entries(&computed), ["memo 0", "memo 2"]);
}

// =============================================================================
// RERENDER QUEUE
// =============================================================================

#[test]
fn test_deepest_dirty_node_settles_first() {
    let seen = log();

    let make = |name: &'static str| {
        let record = seen.clone();
        Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
            let (pass, set_pass) = hooks.use_state(0i64)?;
            record.borrow_mut().push(format!("{name}:{pass}"));
            hooks.use_effect(ONCE, move || set_pass.set(1))?;
            Ok(Value::Null)
        })
    };
    let shallow = make("shallow");
    let deep = make("deep");

    let description = el("div")
        .child(el(shallow))
        .child(el("section").child(el("div").child(el(deep))));
    render(description).unwrap();

    assert_eq!(
        entries(&seen),
        ["shallow:0", "deep:0", "deep:1", "shallow:1"]
    );
}

#[test]
fn test_ancestor_rerender_reuses_settled_descendant() {
    let seen = log();

    let record = seen.clone();
    let leaf = Component::from_closure(move |props: &Props, hooks: &mut Hooks<'_>| {
        let (local, set_local) = hooks.use_state(0i64)?;
        let outer = props.get("outer").and_then(Value::as_int).unwrap_or_default();
        record.borrow_mut().push(format!("leaf {outer}/{local}"));
        hooks.use_effect(ONCE, move || set_local.set(1))?;
        Ok(Value::Null)
    });

    let root = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (outer, set_outer) = hooks.use_state(0i64)?;
        hooks.use_effect(ONCE, move || set_outer.set(1))?;
        Ok(el("div").child(el(leaf.clone()).prop("outer", outer)).into())
    });

    render(el(root)).unwrap();
    assert_eq!(entries(&seen), ["leaf 0/0", "leaf 0/1", "leaf 1/1"]);
}

#[test]
fn test_rerender_limit() {
    fn restless(_: &Props, hooks: &mut Hooks<'_>) -> Result<Value> {
        let (count, set_count) = hooks.use_state(0i64)?;
        hooks.use_effect(EVERY_RENDER, move || set_count.set(count + 1))?;
        Ok(count.into())
    }

    let renderer = Renderer::with_config(RenderConfig::new().rerender_limit(Some(10)));
    assert_eq!(
        renderer.render(el(Component::from_fn(restless))).unwrap_err(),
        RenderError::RerenderLimitExceeded(10)
    );
}

// =============================================================================
// UNMOUNT
// =============================================================================

#[test]
fn test_unmount_runs_cleanups_children_first() {
    let seen = log();

    let record = seen.clone();
    let inner = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let log = record.clone();
        hooks.use_effect(ONCE, move || cleanup(&log, "inner"))?;
        Ok("inner".into())
    });

    let record = seen.clone();
    let outer = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let log = record.clone();
        hooks.use_effect(ONCE, move || cleanup(&log, "outer a"))?;
        let log = record.clone();
        hooks.use_effect(ONCE, move || cleanup(&log, "outer b"))?;
        Ok(el("div").child(el(inner.clone())).into())
    });

    let root = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (shown, set_shown) = hooks.use_state(true)?;
        hooks.use_effect(ONCE, move || set_shown.set(false))?;
        Ok(el("main").child(shown.then(|| el(outer.clone()))).into())
    });

    let html = render_to_string(el(root)).unwrap();
    assert_eq!(html, "<main></main>");
    assert_eq!(entries(&seen), ["inner", "outer a", "outer b"]);
}

#[test]
fn test_only_latest_cleanup_runs_at_unmount() {
    let seen = log();
    let hide: Rc<RefCell<Option<Setter<bool>>>> = Rc::new(RefCell::new(None));

    let record = seen.clone();
    let hide_parent = hide.clone();
    let ticker = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (count, set_count) = hooks.use_state(0i64)?;
        let log = record.clone();
        let hide = hide_parent.clone();
        hooks.use_effect(EVERY_RENDER, move || {
            if count < 2 {
                set_count.set(count + 1);
            } else if let Some(hide) = hide.borrow().as_ref() {
                hide.set(false);
            }
            cleanup(&log, format!("cleanup {count}"))
        })?;
        Ok(count.into())
    });

    let parent = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let (shown, set_shown) = hooks.use_state(true)?;
        *hide.borrow_mut() = Some(set_shown);
        Ok(shown.then(|| el(ticker.clone())).into())
    });

    assert_eq!(render_to_string(el(parent)).unwrap(), "");
    assert_eq!(entries(&seen), ["cleanup 2"]);
}

#[test]
fn test_mounted_cleanups_do_not_run_at_end_of_pass() {
    let seen = log();
    let record = seen.clone();
    let component = Component::from_closure(move |_: &Props, hooks: &mut Hooks<'_>| {
        let log = record.clone();
        hooks.use_effect(ONCE, move || cleanup(&log, "cleanup"))?;
        Ok(Value::Null)
    });

    let tree = render(el(component)).unwrap();
    drop(tree);
    assert!(entries(&seen).is_empty());
}
